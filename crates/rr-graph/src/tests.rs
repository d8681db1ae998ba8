//! Unit tests for rr-graph.
//!
//! All tests use hand-crafted networks so they run without any graph files.

#[cfg(test)]
mod helpers {
    use rr_core::{GeoPoint, Highway, NodeId, SegmentId};

    use crate::{Graph, GraphBuilder, Way};

    /// A 2×2 grid with one diagonal:
    ///
    /// ```text
    ///   2 ─ 3
    ///   │ ╲ │
    ///   0 ─ 1
    /// ```
    ///
    /// Segments: 0-1, 2-3, 0-2, 1-3, 2-1 (diagonal), all residential.
    pub fn grid() -> (Graph, [NodeId; 4], [SegmentId; 5]) {
        let mut b = GraphBuilder::new();
        let w = b.add_way(Way::new(Highway::Residential));

        let n0 = b.add_node(GeoPoint::new(0.00, 0.00));
        let n1 = b.add_node(GeoPoint::new(0.00, 0.01));
        let n2 = b.add_node(GeoPoint::new(0.01, 0.00));
        let n3 = b.add_node(GeoPoint::new(0.01, 0.01));

        let s01 = b.add_segment(n0, n1, w);
        let s23 = b.add_segment(n2, n3, w);
        let s02 = b.add_segment(n0, n2, w);
        let s13 = b.add_segment(n1, n3, w);
        let s21 = b.add_segment(n2, n1, w);

        (b.build(), [n0, n1, n2, n3], [s01, s23, s02, s13, s21])
    }
}

// ── Builder & adjacency ───────────────────────────────────────────────────────

#[cfg(test)]
mod builder {
    use rr_core::{GeoPoint, Highway};

    use crate::{GraphBuilder, Way};

    #[test]
    fn empty_build() {
        let g = GraphBuilder::new().build();
        assert_eq!(g.node_count(), 0);
        assert_eq!(g.segment_count(), 0);
        assert!(g.is_empty());
    }

    #[test]
    fn segment_listed_under_both_endpoints() {
        let (g, [n0, n1, n2, n3], [s01, ..]) = super::helpers::grid();

        assert!(g.segments_at(n0).any(|s| s == s01));
        assert!(g.segments_at(n1).any(|s| s == s01));

        assert_eq!(g.degree(n0), 2); // 0-1, 0-2
        assert_eq!(g.degree(n1), 3); // 0-1, 1-3, 2-1
        assert_eq!(g.degree(n2), 3); // 2-3, 0-2, 2-1
        assert_eq!(g.degree(n3), 2); // 2-3, 1-3
    }

    #[test]
    fn other_node_convention() {
        let (g, [n0, n1, ..], [s01, ..]) = super::helpers::grid();
        assert_eq!(g.other_node(s01, n0), n1);
        assert_eq!(g.other_node(s01, n1), n0);
    }

    #[test]
    fn distances_from_geometry() {
        let (g, _, [s01, ..]) = super::helpers::grid();
        // 0.01° of longitude at the equator ≈ 1.11 km.
        let d = g.distance(s01);
        assert!((d - 1_112.0).abs() < 20.0, "got {d}");
    }

    #[test]
    fn super_shortcut_keeps_explicit_weight() {
        let mut b = GraphBuilder::new();
        let w = b.add_way(Way::new(Highway::Primary));
        let a = b.add_node(GeoPoint::new(0.0, 0.0));
        let c = b.add_node(GeoPoint::new(0.0, 1.0));
        b.mark_super_node(a);
        b.mark_super_node(c);
        let s = b.add_super_shortcut(a, c, w, 123_456.0);
        let g = b.build();

        assert!(g.is_super_segment(s));
        assert!(!g.is_normal_segment(s));
        assert_eq!(g.distance(s), 123_456.0);
        assert!(g.is_super_node(a));
    }
}

// ── One-way semantics ─────────────────────────────────────────────────────────

#[cfg(test)]
mod oneway {
    use rr_core::{GeoPoint, Highway};

    use crate::{GraphBuilder, Way};

    #[test]
    fn oneway_towards_destination_only() {
        let mut b = GraphBuilder::new();
        let w = b.add_way(Way::new(Highway::Residential));
        let a = b.add_node(GeoPoint::new(0.0, 0.0));
        let c = b.add_node(GeoPoint::new(0.0, 0.01));
        let s = b.add_segment(a, c, w);
        b.oneway(s, a); // travel a → c only
        let g = b.build();

        // Arriving at c is fine; the segment may not be used to leave c.
        assert!(g.is_oneway_towards(s, c));
        assert!(!g.is_oneway_towards(s, a));
    }
}

// ── Turn restrictions ─────────────────────────────────────────────────────────

#[cfg(test)]
mod restrictions {
    use rr_core::SegmentId;

    use crate::RestrictionKind;
    use crate::tests::helpers::grid;

    #[test]
    fn unrestricted_by_default() {
        let (g, [_, n1, ..], [s01, _, _, s13, s21]) = grid();
        assert!(g.turn_allowed(s01, n1, s13));
        assert!(g.turn_allowed(s01, n1, s21));
    }

    #[test]
    fn no_restriction_blocks_single_turn() {
        let mut b = crate::GraphBuilder::new();
        let w = b.add_way(crate::Way::new(rr_core::Highway::Residential));
        let n0 = b.add_node(rr_core::GeoPoint::new(0.0, 0.0));
        let n1 = b.add_node(rr_core::GeoPoint::new(0.0, 0.01));
        let n2 = b.add_node(rr_core::GeoPoint::new(0.01, 0.01));
        let n3 = b.add_node(rr_core::GeoPoint::new(-0.01, 0.01));
        let s01 = b.add_segment(n0, n1, w);
        let s12 = b.add_segment(n1, n2, w);
        let s13 = b.add_segment(n1, n3, w);
        b.add_turn_restriction(s01, n1, s12, RestrictionKind::No);
        let g = b.build();

        assert!(!g.turn_allowed(s01, n1, s12));
        assert!(g.turn_allowed(s01, n1, s13));
        // The restriction is directional: entering by another segment is fine.
        assert!(g.turn_allowed(s13, n1, s12));
    }

    #[test]
    fn only_restriction_blocks_everything_else() {
        let mut b = crate::GraphBuilder::new();
        let w = b.add_way(crate::Way::new(rr_core::Highway::Residential));
        let n0 = b.add_node(rr_core::GeoPoint::new(0.0, 0.0));
        let n1 = b.add_node(rr_core::GeoPoint::new(0.0, 0.01));
        let n2 = b.add_node(rr_core::GeoPoint::new(0.01, 0.01));
        let n3 = b.add_node(rr_core::GeoPoint::new(-0.01, 0.01));
        let s01 = b.add_segment(n0, n1, w);
        let s12 = b.add_segment(n1, n2, w);
        let s13 = b.add_segment(n1, n3, w);
        b.add_turn_restriction(s01, n1, s12, RestrictionKind::Only);
        let g = b.build();

        assert!(g.turn_allowed(s01, n1, s12));
        assert!(!g.turn_allowed(s01, n1, s13));
    }

    #[test]
    fn route_start_is_unrestricted() {
        let (g, [_, n1, ..], [_, _, _, s13, _]) = grid();
        assert!(g.turn_allowed(SegmentId::INVALID, n1, s13));
    }
}

// ── Spatial snapping ──────────────────────────────────────────────────────────

#[cfg(test)]
mod snap {
    use rr_core::GeoPoint;

    use crate::tests::helpers::grid;

    #[test]
    fn nearest_node_exact() {
        let (g, [n0, ..], _) = grid();
        assert_eq!(g.nearest_node(GeoPoint::new(0.0, 0.0)), Some(n0));
    }

    #[test]
    fn nearest_segment_midpoint() {
        let (g, _, [s01, ..]) = grid();
        // A point just south of the middle of segment 0-1.
        let snap = g.nearest_segment(GeoPoint::new(-0.001, 0.005), 1_000.0).unwrap();
        assert_eq!(snap.segment, s01);
        assert!((snap.t - 0.5).abs() < 0.05, "t = {}", snap.t);
        assert!(snap.dist_m < 200.0);
    }

    #[test]
    fn nearest_segment_out_of_range() {
        let (g, _, _) = grid();
        assert!(g.nearest_segment(GeoPoint::new(5.0, 5.0), 1_000.0).is_none());
    }

    #[test]
    fn empty_graph_has_no_nearest() {
        let g = crate::GraphBuilder::new().build();
        assert!(g.nearest_node(GeoPoint::new(0.0, 0.0)).is_none());
    }
}

// ── File round-trip ───────────────────────────────────────────────────────────

#[cfg(test)]
mod files {
    use rr_core::{GeoPoint, Highway, Transport, Transports};

    use crate::file::{FORMAT_VERSION, load, save};
    use crate::{GraphBuilder, GraphError, RestrictionKind, Way};

    fn sample() -> crate::Graph {
        let mut b = GraphBuilder::new();
        let w1 = b.add_way(Way::named(Highway::Primary, "High Street"));
        let mut w = Way::new(Highway::Cycleway);
        w.transports = Transports::single(Transport::Bicycle);
        let w2 = b.add_way(w);

        let n0 = b.add_node(GeoPoint::new(51.50, -0.10));
        let n1 = b.add_node(GeoPoint::new(51.51, -0.10));
        let n2 = b.add_node(GeoPoint::new(51.51, -0.09));
        b.mark_super_node(n1);
        b.mark_mini_roundabout(n2);

        let s0 = b.add_segment(n0, n1, w1);
        let s1 = b.add_segment(n1, n2, w2);
        b.oneway(s0, n0);
        b.add_turn_restriction(s0, n1, s1, RestrictionKind::No);
        b.build()
    }

    #[test]
    fn round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let g = sample();
        save(&g, dir.path(), "test").unwrap();
        let loaded = load(dir.path(), "test").unwrap();

        assert_eq!(loaded.node_count(), g.node_count());
        assert_eq!(loaded.segment_count(), g.segment_count());
        assert_eq!(loaded.way_count(), g.way_count());
        assert_eq!(loaded.relation_count(), 1);

        assert_eq!(loaded.way(rr_core::SegmentId(0)).name, "High Street");
        assert!(loaded.is_super_node(rr_core::NodeId(1)));
        assert!(loaded.is_mini_roundabout(rr_core::NodeId(2)));
        assert!(loaded.is_oneway_towards(rr_core::SegmentId(0), rr_core::NodeId(1)));
        assert!(!loaded.turn_allowed(
            rr_core::SegmentId(0),
            rr_core::NodeId(1),
            rr_core::SegmentId(1)
        ));
    }

    #[test]
    fn version_mismatch_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        save(&sample(), dir.path(), "test").unwrap();

        // Corrupt the version field of the nodes file.
        let path = dir.path().join("test-nodes.bin");
        let mut bytes = std::fs::read(&path).unwrap();
        bytes[4..8].copy_from_slice(&(FORMAT_VERSION + 1).to_le_bytes());
        std::fs::write(&path, bytes).unwrap();

        match load(dir.path(), "test") {
            Err(GraphError::UnsupportedVersion { found, expected, .. }) => {
                assert_eq!(found, FORMAT_VERSION + 1);
                assert_eq!(expected, FORMAT_VERSION);
            }
            Err(other) => panic!("expected version error, got {other}"),
            Ok(_) => panic!("expected version error, got success"),
        }
    }

    #[test]
    fn bad_magic_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        save(&sample(), dir.path(), "test").unwrap();

        let path = dir.path().join("test-segments.bin");
        let mut bytes = std::fs::read(&path).unwrap();
        bytes[0..4].copy_from_slice(b"NOPE");
        std::fs::write(&path, bytes).unwrap();

        assert!(matches!(
            load(dir.path(), "test"),
            Err(GraphError::BadMagic { .. })
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(load(dir.path(), "absent"), Err(GraphError::Io(_))));
    }
}
