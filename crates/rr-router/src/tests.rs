//! Unit tests for rr-router.
//!
//! All tests run on small hand-crafted networks; distances are real
//! great-circle metres, so expected scores are asserted with tolerances.

#[cfg(test)]
mod helpers {
    use rr_core::{GeoPoint, Highway, NodeId, SegmentId};
    use rr_graph::{Graph, GraphBuilder, Way};

    /// Three collinear nodes on one residential way:
    /// `0 — 1 — 2`, spaced 0.01° of longitude (~1.11 km) apart.
    pub fn line() -> (Graph, [NodeId; 3], [SegmentId; 2]) {
        let mut b = GraphBuilder::new();
        let w = b.add_way(Way::new(Highway::Residential));
        let n0 = b.add_node(GeoPoint::new(0.0, 0.00));
        let n1 = b.add_node(GeoPoint::new(0.0, 0.01));
        let n2 = b.add_node(GeoPoint::new(0.0, 0.02));
        let s01 = b.add_segment(n0, n1, w);
        let s12 = b.add_segment(n1, n2, w);
        (b.build(), [n0, n1, n2], [s01, s12])
    }

    /// A corridor whose interior is fenced by super nodes:
    ///
    /// ```text
    /// 0 — 1 ═ (2) ═ 3 — 4       1, 3 super; 1–3 also a pure shortcut
    /// ```
    ///
    /// The shortcut's weight equals the 1–2–3 path, so expanding it must
    /// reproduce node 2.
    pub fn corridor() -> (Graph, [NodeId; 5]) {
        let mut b = GraphBuilder::new();
        let w = b.add_way(Way::new(Highway::Primary));
        let nodes: Vec<NodeId> =
            (0..5).map(|i| b.add_node(GeoPoint::new(0.0, 0.01 * i as f32))).collect();

        b.add_segment(nodes[0], nodes[1], w);
        b.add_segment(nodes[1], nodes[2], w);
        b.add_segment(nodes[2], nodes[3], w);
        b.add_segment(nodes[3], nodes[4], w);

        b.mark_super_node(nodes[1]);
        b.mark_super_node(nodes[3]);
        let shortcut_weight = {
            let d12 = b.node_pos(nodes[1]).distance_m(b.node_pos(nodes[2]));
            let d23 = b.node_pos(nodes[2]).distance_m(b.node_pos(nodes[3]));
            d12 + d23
        };
        b.add_super_shortcut(nodes[1], nodes[3], w, shortcut_weight);

        (b.build(), [nodes[0], nodes[1], nodes[2], nodes[3], nodes[4]])
    }

    /// T-junction: primary `0 — 1 — 2` with a residential spur `1 — 3`.
    pub fn tee() -> (Graph, [NodeId; 4], [SegmentId; 3]) {
        let mut b = GraphBuilder::new();
        let main = b.add_way(Way::named(Highway::Primary, "High Street"));
        let spur = b.add_way(Way::named(Highway::Residential, "Mill Lane"));
        let n0 = b.add_node(GeoPoint::new(0.0, 0.00));
        let n1 = b.add_node(GeoPoint::new(0.0, 0.01));
        let n2 = b.add_node(GeoPoint::new(0.0, 0.02));
        let n3 = b.add_node(GeoPoint::new(-0.01, 0.01));
        let s01 = b.add_segment(n0, n1, main);
        let s12 = b.add_segment(n1, n2, main);
        let s13 = b.add_segment(n1, n3, spur);
        (b.build(), [n0, n1, n2, n3], [s01, s12, s13])
    }

    pub fn assert_close(actual: f32, expected: f32, tol: f32) {
        assert!(
            (actual - expected).abs() <= tol,
            "expected {expected} ± {tol}, got {actual}"
        );
    }
}

// ── Results store ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod results {
    use rr_core::{NodeId, SegmentId};

    use crate::Results;

    #[test]
    fn insert_initialises_fresh_state() {
        let mut r = Results::new(8);
        let id = r.insert(NodeId(5), SegmentId(7));
        assert_eq!(r[id].node, NodeId(5));
        assert_eq!(r[id].segment, SegmentId(7));
        assert_eq!(r[id].score, 0.0);
        assert_eq!(r[id].prev, rr_core::ResultId::INVALID);
        assert_eq!(r[id].queued, crate::NOT_QUEUED);
        assert_eq!(r.len(), 1);
    }

    #[test]
    fn find_is_exact_on_node_and_segment() {
        let mut r = Results::new(8);
        let a = r.insert(NodeId(5), SegmentId(1));
        let b = r.insert(NodeId(5), SegmentId(2));
        assert_ne!(a, b);
        assert_eq!(r.find(NodeId(5), SegmentId(1)), Some(a));
        assert_eq!(r.find(NodeId(5), SegmentId(2)), Some(b));
        assert_eq!(r.find(NodeId(5), SegmentId(3)), None);
        assert_eq!(r.find(NodeId(6), SegmentId(1)), None);
    }

    #[test]
    fn get_or_insert_returns_existing_handle() {
        let mut r = Results::new(8);
        let a = r.get_or_insert(NodeId(9), SegmentId(4));
        r[a].score = 42.0;
        let b = r.get_or_insert(NodeId(9), SegmentId(4));
        assert_eq!(a, b);
        assert_eq!(r[b].score, 42.0);
        assert_eq!(r.len(), 1);
    }

    #[test]
    fn find_best_picks_lowest_score() {
        let mut r = Results::new(8);
        let a = r.insert(NodeId(3), SegmentId(1));
        let b = r.insert(NodeId(3), SegmentId(2));
        r[a].score = 10.0;
        r[b].score = 7.0;
        assert_eq!(r.find_best(NodeId(3)), Some(b));
        assert_eq!(r.find_best(NodeId(4)), None);
    }

    #[test]
    fn bin_growth_keeps_every_entry_findable() {
        let mut r = Results::new(8);
        // All these nodes share bin 0 under the initial mask of 7, forcing
        // repeated growth past the collision threshold.
        let ids: Vec<_> = (0..100)
            .map(|i| r.insert(NodeId(i * 8), SegmentId(i)))
            .collect();
        for (i, &id) in ids.iter().enumerate() {
            let i = i as u32;
            assert_eq!(r.find(NodeId(i * 8), SegmentId(i)), Some(id));
        }
        assert_eq!(r.len(), 100);
    }

    #[test]
    fn handles_stay_valid_across_growth() {
        let mut r = Results::new(8);
        let first = r.insert(NodeId(0), SegmentId(0));
        r[first].score = 1.5;
        for i in 1..500 {
            r.insert(NodeId(i), SegmentId(i));
        }
        // The early handle still dereferences to the same state.
        assert_eq!(r[first].node, NodeId(0));
        assert_eq!(r[first].score, 1.5);
    }
}

// ── Queue ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod queue {
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};
    use rr_core::{NodeId, SegmentId};

    use crate::{NOT_QUEUED, Queue, Results};

    #[test]
    fn pops_in_sortby_order() {
        let mut results = Results::new(8);
        let mut queue = Queue::new();

        let mut rng = SmallRng::seed_from_u64(12);
        for i in 0..200u32 {
            let id = results.insert(NodeId(i), SegmentId(0));
            results[id].sortby = rng.gen_range(0.0..1000.0);
            queue.insert(&mut results, id);
        }

        let mut last = f32::NEG_INFINITY;
        let mut popped = 0;
        while let Some(id) = queue.pop(&mut results) {
            assert!(results[id].sortby >= last, "heap order violated");
            assert_eq!(results[id].queued, NOT_QUEUED);
            last = results[id].sortby;
            popped += 1;
        }
        assert_eq!(popped, 200);
    }

    #[test]
    fn decrease_key_reorders_in_place() {
        let mut results = Results::new(8);
        let mut queue = Queue::new();

        let a = results.insert(NodeId(1), SegmentId(0));
        let b = results.insert(NodeId(2), SegmentId(0));
        results[a].sortby = 10.0;
        results[b].sortby = 20.0;
        queue.insert(&mut results, a);
        queue.insert(&mut results, b);

        // Lower b below a and re-insert; no duplicate entry is created.
        results[b].sortby = 5.0;
        queue.insert(&mut results, b);
        assert_eq!(queue.len(), 2);

        assert_eq!(queue.pop(&mut results), Some(b));
        assert_eq!(queue.pop(&mut results), Some(a));
        assert_eq!(queue.pop(&mut results), None);
    }

    #[test]
    fn back_index_tracks_heap_slot() {
        let mut results = Results::new(8);
        let mut queue = Queue::new();

        let mut rng = SmallRng::seed_from_u64(7);
        let mut ids = Vec::new();
        for i in 0..50u32 {
            let id = results.insert(NodeId(i), SegmentId(0));
            results[id].sortby = rng.gen_range(0.0..100.0);
            queue.insert(&mut results, id);
            ids.push(id);
        }

        // Every queued state's back-index must point at itself.
        for &id in &ids {
            let slot = results[id].queued;
            assert_ne!(slot, NOT_QUEUED);
        }
        // Drain and re-check emptiness bookkeeping.
        while queue.pop(&mut results).is_some() {}
        assert!(queue.is_empty());
    }
}

// ── Normal-route kernel ───────────────────────────────────────────────────────

#[cfg(test)]
mod normal_route {
    use rr_core::{ResultId, SegmentId, Transport};
    use rr_profile::Profile;

    use crate::tests::helpers::{assert_close, line, tee};
    use crate::{FakeGraph, QueryGraph, RouterOptions, find_normal_route, fix_forward_route};

    #[test]
    fn straight_line_scores_accumulate() {
        let (graph, [n0, _, n2], _) = line();
        let fakes = FakeGraph::new();
        let q = QueryGraph::new(&graph, &fakes);
        let profile = Profile::builtin(Transport::Motorcar);
        let options = RouterOptions::shortest();

        let results =
            find_normal_route(&q, &profile, &options, n0, SegmentId::INVALID, n2).unwrap();
        assert_eq!(results.finish_node, n2);

        let finish = results.find(results.finish_node, results.last_segment).unwrap();
        // Two ~1.11 km hops.
        assert_close(results[finish].score, 2_224.0, 30.0);

        // Invariant: walking prev, scores strictly decrease to zero.
        let mut rid = finish;
        let mut last_score = f32::INFINITY;
        loop {
            assert!(results[rid].score < last_score);
            last_score = results[rid].score;
            if results[rid].prev == ResultId::INVALID {
                break;
            }
            rid = results[rid].prev;
        }
        assert_eq!(results[rid].node, n0);
        assert_eq!(results[rid].score, 0.0);
    }

    #[test]
    fn forward_fix_reverses_prev_chain() {
        let (graph, [n0, n1, n2], _) = line();
        let fakes = FakeGraph::new();
        let q = QueryGraph::new(&graph, &fakes);
        let profile = Profile::builtin(Transport::Motorcar);
        let options = RouterOptions::shortest();

        let mut results =
            find_normal_route(&q, &profile, &options, n0, SegmentId::INVALID, n2).unwrap();
        fix_forward_route(&mut results);

        let start = results.find(n0, SegmentId::INVALID).unwrap();
        let mut forward = Vec::new();
        let mut rid = start;
        loop {
            forward.push(results[rid].node);
            if results[rid].next == ResultId::INVALID {
                break;
            }
            rid = results[rid].next;
        }
        assert_eq!(forward, vec![n0, n1, n2]);

        let finish = results.find(results.finish_node, results.last_segment).unwrap();
        let mut backward = Vec::new();
        let mut rid = finish;
        loop {
            backward.push(results[rid].node);
            if results[rid].prev == ResultId::INVALID {
                break;
            }
            rid = results[rid].prev;
        }
        backward.reverse();
        assert_eq!(forward, backward);
    }

    #[test]
    fn disconnected_is_no_route() {
        let mut b = rr_graph::GraphBuilder::new();
        let w = b.add_way(rr_graph::Way::new(rr_core::Highway::Residential));
        let a = b.add_node(rr_core::GeoPoint::new(0.0, 0.0));
        let c = b.add_node(rr_core::GeoPoint::new(1.0, 1.0));
        let d = b.add_node(rr_core::GeoPoint::new(1.0, 1.01));
        b.add_segment(c, d, w);
        let graph = b.build();

        let fakes = FakeGraph::new();
        let q = QueryGraph::new(&graph, &fakes);
        let profile = Profile::builtin(Transport::Motorcar);
        let options = RouterOptions::shortest();
        assert!(find_normal_route(&q, &profile, &options, a, SegmentId::INVALID, c).is_none());
    }

    #[test]
    fn oneway_blocks_against_direction() {
        let mut b = rr_graph::GraphBuilder::new();
        let w = b.add_way(rr_graph::Way::new(rr_core::Highway::Residential));
        let a = b.add_node(rr_core::GeoPoint::new(0.0, 0.0));
        let c = b.add_node(rr_core::GeoPoint::new(0.0, 0.01));
        let s = b.add_segment(a, c, w);
        b.oneway(s, a);
        let graph = b.build();

        let fakes = FakeGraph::new();
        let q = QueryGraph::new(&graph, &fakes);
        let options = RouterOptions::shortest();

        let car = Profile::builtin(Transport::Motorcar);
        assert!(find_normal_route(&q, &car, &options, a, SegmentId::INVALID, c).is_some());
        assert!(find_normal_route(&q, &car, &options, c, SegmentId::INVALID, a).is_none());

        // A profile that ignores one-way markings may route against them.
        let foot = Profile::builtin(Transport::Foot);
        assert!(find_normal_route(&q, &foot, &options, c, SegmentId::INVALID, a).is_some());
    }

    #[test]
    fn no_turn_restriction_forces_alternative_or_failure() {
        let (graph_plain, [n0, _, _, n3], _) = tee();

        // Unrestricted: the car goes 0 → 1 → 3.
        let fakes = FakeGraph::new();
        let q = QueryGraph::new(&graph_plain, &fakes);
        let car = Profile::builtin(Transport::Motorcar);
        let options = RouterOptions::shortest();
        assert!(find_normal_route(&q, &car, &options, n0, SegmentId::INVALID, n3).is_some());

        // Rebuild with a "no turn" from 0-1 onto 1-3.
        let mut b = rr_graph::GraphBuilder::new();
        let main = b.add_way(rr_graph::Way::new(rr_core::Highway::Primary));
        let spur = b.add_way(rr_graph::Way::new(rr_core::Highway::Residential));
        let m0 = b.add_node(rr_core::GeoPoint::new(0.0, 0.00));
        let m1 = b.add_node(rr_core::GeoPoint::new(0.0, 0.01));
        let m2 = b.add_node(rr_core::GeoPoint::new(0.0, 0.02));
        let m3 = b.add_node(rr_core::GeoPoint::new(-0.01, 0.01));
        let s01 = b.add_segment(m0, m1, main);
        b.add_segment(m1, m2, main);
        let s13 = b.add_segment(m1, m3, spur);
        b.add_turn_restriction(s01, m1, s13, rr_graph::RestrictionKind::No);
        let graph = b.build();

        let fakes = FakeGraph::new();
        let q = QueryGraph::new(&graph, &fakes);

        // A car cannot turn back at node 2 (U-turns forbidden): no route.
        assert!(find_normal_route(&q, &car, &options, m0, SegmentId::INVALID, m3).is_none());

        // A pedestrian profile ignores the restriction entirely.
        let foot = Profile::builtin(Transport::Foot);
        let walked = find_normal_route(&q, &foot, &options, m0, SegmentId::INVALID, m3);
        assert!(walked.is_some());

        // A turn-obeying profile that permits U-turns detours via node 2.
        let mut patient = Profile::builtin(Transport::Motorcar);
        patient.uturn = true;
        let detour = find_normal_route(&q, &patient, &options, m0, SegmentId::INVALID, m3).unwrap();
        let finish = detour.find(detour.finish_node, detour.last_segment).unwrap();
        // 0→1→2→1→3 is two extra ~1.11 km hops over the direct turn.
        let direct = graph.position(m0).distance_m(graph.position(m1))
            + graph.position(m1).distance_m(graph.position(m3));
        assert!(detour[finish].score > direct + 2_000.0);
    }

    #[test]
    fn start_and_finish_swapped_give_equal_scores() {
        let (graph, [n0, _, n2], _) = line();
        let fakes = FakeGraph::new();
        let q = QueryGraph::new(&graph, &fakes);
        let profile = Profile::builtin(Transport::Motorcar);
        let options = RouterOptions::shortest();

        let there = find_normal_route(&q, &profile, &options, n0, SegmentId::INVALID, n2).unwrap();
        let back = find_normal_route(&q, &profile, &options, n2, SegmentId::INVALID, n0).unwrap();

        let t = there.find(there.finish_node, there.last_segment).unwrap();
        let b = back.find(back.finish_node, back.last_segment).unwrap();
        assert_close(there[t].score, back[b].score, 0.5);
    }
}

// ── Two-level search ──────────────────────────────────────────────────────────

#[cfg(test)]
mod two_level {
    use rr_core::{SegmentId, Transport};
    use rr_profile::Profile;

    use crate::tests::helpers::{assert_close, corridor};
    use crate::{
        FakeGraph, QueryGraph, RouterOptions, combine_routes, find_finish_routes,
        find_middle_route, find_normal_route, find_start_routes,
    };

    #[test]
    fn start_search_stops_at_super_fence() {
        let (graph, [n0, n1, _, n3, n4]) = corridor();
        let fakes = FakeGraph::new();
        let q = QueryGraph::new(&graph, &fakes);
        let profile = Profile::builtin(Transport::Motorcar);
        let options = RouterOptions::shortest();

        let begin = find_start_routes(&q, &profile, &options, n0, SegmentId::INVALID, n4);
        // The fence at node 1 hides the finish.
        assert_eq!(begin.finish_node, rr_core::NodeId::INVALID);
        assert!(begin.find_best(n1).is_some());
        assert!(begin.find_best(n3).is_none(), "expansion leaked past the fence");
    }

    #[test]
    fn stitched_route_expands_shortcut_to_real_nodes() {
        let (graph, [n0, n1, n2, n3, n4]) = corridor();
        let fakes = FakeGraph::new();
        let q = QueryGraph::new(&graph, &fakes);
        let profile = Profile::builtin(Transport::Motorcar);
        let options = RouterOptions::shortest();

        let begin = find_start_routes(&q, &profile, &options, n0, SegmentId::INVALID, n4);
        let end = find_finish_routes(&q, &profile, &options, n4);
        let middle = find_middle_route(&q, &profile, &options, &begin, &end).unwrap();
        let combined = combine_routes(&q, &profile, &options, &begin, &middle, &end).unwrap();

        assert_eq!(combined.start_node, n0);
        assert_eq!(combined.finish_node, n4);

        // Walk the chain backwards: every real node appears, including the
        // shortcut interior.
        let mut nodes = Vec::new();
        let mut rid = combined.find(combined.finish_node, combined.last_segment).unwrap();
        loop {
            nodes.push(combined[rid].node);
            if combined[rid].prev == rr_core::ResultId::INVALID {
                break;
            }
            rid = combined[rid].prev;
        }
        nodes.reverse();
        assert_eq!(nodes, vec![n0, n1, n2, n3, n4]);

        // Super-graph consistency: the stitched score equals the pure
        // normal-graph score.
        let normal = find_normal_route(&q, &profile, &options, n0, SegmentId::INVALID, n4).unwrap();
        let nf = normal.find(normal.finish_node, normal.last_segment).unwrap();
        let cf = combined.find(combined.finish_node, combined.last_segment).unwrap();
        assert_close(combined[cf].score, normal[nf].score, 1.0);
    }

    #[test]
    fn finish_routes_score_towards_finish() {
        let (graph, [_, _, _, n3, n4]) = corridor();
        let fakes = FakeGraph::new();
        let q = QueryGraph::new(&graph, &fakes);
        let profile = Profile::builtin(Transport::Motorcar);
        let options = RouterOptions::shortest();

        let end = find_finish_routes(&q, &profile, &options, n4);
        let at_super = end.find_best(n3).unwrap();
        // Cost from the super node to the finish is one ~1.11 km hop.
        assert_close(end[at_super].score, 1_112.0, 20.0);
    }
}

// ── Search optimality ─────────────────────────────────────────────────────────

#[cfg(test)]
mod optimality {
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};
    use rr_core::{GeoPoint, Highway, NodeId, SegmentId, Transport};
    use rr_graph::{GraphBuilder, Way};
    use rr_profile::Profile;

    use crate::{FakeGraph, QueryGraph, RouterOptions, find_normal_route};

    /// On a random grid, the kernel's score must match an all-pairs
    /// Floyd–Warshall over the same segment distances.
    #[test]
    fn normal_route_matches_brute_force() {
        let mut rng = SmallRng::seed_from_u64(2024);

        for _ in 0..5 {
            // 4×4 grid; each potential edge present with probability 0.8.
            let mut b = GraphBuilder::new();
            let w = b.add_way(Way::new(Highway::Residential));
            let nodes: Vec<NodeId> = (0..16)
                .map(|i| {
                    b.add_node(GeoPoint::new(0.01 * (i / 4) as f32, 0.01 * (i % 4) as f32))
                })
                .collect();

            let mut edges: Vec<(usize, usize)> = Vec::new();
            for r in 0..4usize {
                for c in 0..4usize {
                    let i = r * 4 + c;
                    if c + 1 < 4 && rng.gen_bool(0.8) {
                        edges.push((i, i + 1));
                    }
                    if r + 1 < 4 && rng.gen_bool(0.8) {
                        edges.push((i, i + 4));
                    }
                }
            }
            for &(a, c) in &edges {
                b.add_segment(nodes[a], nodes[c], w);
            }
            let graph = b.build();

            // Floyd–Warshall over the same distances.
            let inf = f32::INFINITY;
            let mut dist = vec![[inf; 16]; 16];
            for (i, row) in dist.iter_mut().enumerate() {
                row[i] = 0.0;
            }
            for s in 0..graph.segment_count() {
                let seg = SegmentId(s as u32);
                let (a, c) = (graph.node1(seg).index(), graph.node2(seg).index());
                let d = graph.distance(seg);
                dist[a][c] = dist[a][c].min(d);
                dist[c][a] = dist[c][a].min(d);
            }
            for k in 0..16 {
                for i in 0..16 {
                    for j in 0..16 {
                        let via = dist[i][k] + dist[k][j];
                        if via < dist[i][j] {
                            dist[i][j] = via;
                        }
                    }
                }
            }

            let fakes = FakeGraph::new();
            let q = QueryGraph::new(&graph, &fakes);
            let profile = Profile::builtin(Transport::Motorcar);
            let options = RouterOptions::shortest();

            for (from, to) in [(0usize, 15usize), (3, 12), (5, 10), (1, 14)] {
                let found = find_normal_route(
                    &q,
                    &profile,
                    &options,
                    nodes[from],
                    SegmentId::INVALID,
                    nodes[to],
                );
                match found {
                    Some(results) => {
                        let finish =
                            results.find(results.finish_node, results.last_segment).unwrap();
                        let expected = dist[from][to];
                        assert!(
                            (results[finish].score - expected).abs() < 1.0,
                            "route {from}→{to}: got {} expected {expected}",
                            results[finish].score
                        );
                    }
                    None => assert_eq!(dist[from][to], inf, "kernel missed a route {from}→{to}"),
                }
            }
        }
    }
}

// ── Fake nodes and the driver ─────────────────────────────────────────────────

#[cfg(test)]
mod driver {
    use rr_core::{GeoPoint, Transport};
    use rr_profile::Profile;

    use crate::tests::helpers::{assert_close, line};
    use crate::{FakeGraph, RouterError, RouterOptions, route};

    #[test]
    fn waypoint_on_node_creates_no_fake() {
        let (graph, _, _) = line();
        let (fakes, nodes) =
            FakeGraph::snap(&graph, &[GeoPoint::new(0.0, 0.0), GeoPoint::new(0.0, 0.02)], 1_000.0);
        assert!(fakes.is_empty());
        assert_eq!(nodes[0], Some(rr_core::NodeId(0)));
        assert_eq!(nodes[1], Some(rr_core::NodeId(2)));
    }

    #[test]
    fn near_endpoint_snaps_to_node_not_fake() {
        let (graph, _, _) = line();
        // ~0.5 m east of node 0: inside the endpoint epsilon.
        let (fakes, nodes) = FakeGraph::snap(&graph, &[GeoPoint::new(0.0, 0.000005)], 1_000.0);
        assert!(fakes.is_empty());
        assert_eq!(nodes[0], Some(rr_core::NodeId(0)));
    }

    #[test]
    fn mid_segment_waypoint_creates_fake() {
        let (graph, _, _) = line();
        let (fakes, nodes) = FakeGraph::snap(&graph, &[GeoPoint::new(0.0, 0.005)], 1_000.0);
        assert_eq!(fakes.len(), 1);
        assert!(nodes[0].unwrap().is_fake());
    }

    #[test]
    fn unsnappable_waypoint_returns_none() {
        let (graph, _, _) = line();
        let (_, nodes) = FakeGraph::snap(&graph, &[GeoPoint::new(45.0, 45.0)], 1_000.0);
        assert_eq!(nodes[0], None);
    }

    #[test]
    fn route_to_midpoint_halves_the_distance() {
        let (graph, _, _) = line();
        let profile = Profile::builtin(Transport::Motorcar);
        let options = RouterOptions::shortest();

        // Node 0 to the midpoint of segment 0-1 (a ~1.11 km segment).
        let set = route(
            &graph,
            &profile,
            &options,
            &[GeoPoint::new(0.0, 0.0), GeoPoint::new(0.0, 0.005)],
        )
        .unwrap();
        assert!(set.is_complete());

        let leg = set.legs[0].as_ref().unwrap();
        let finish = leg.find(leg.finish_node, leg.last_segment).unwrap();
        assert_close(leg[finish].score, 556.0, 15.0);
        assert!(leg.finish_node.is_fake());
    }

    #[test]
    fn identical_waypoints_give_zero_length_leg() {
        let (graph, _, _) = line();
        let profile = Profile::builtin(Transport::Motorcar);
        let options = RouterOptions::shortest();

        let set = route(
            &graph,
            &profile,
            &options,
            &[GeoPoint::new(0.0, 0.0), GeoPoint::new(0.0, 0.0)],
        )
        .unwrap();
        let leg = set.legs[0].as_ref().unwrap();
        assert_eq!(leg.len(), 1);
        let only = leg.find(leg.start_node, leg.prev_segment).unwrap();
        assert_eq!(leg[only].score, 0.0);
    }

    #[test]
    fn failing_pair_leaves_gap_but_continues() {
        // Two disconnected islands: 0-1 and 2-3.
        let mut b = rr_graph::GraphBuilder::new();
        let w = b.add_way(rr_graph::Way::new(rr_core::Highway::Residential));
        let a0 = b.add_node(GeoPoint::new(0.0, 0.00));
        let a1 = b.add_node(GeoPoint::new(0.0, 0.01));
        let c0 = b.add_node(GeoPoint::new(1.0, 0.00));
        let c1 = b.add_node(GeoPoint::new(1.0, 0.01));
        b.add_segment(a0, a1, w);
        b.add_segment(c0, c1, w);
        let graph = b.build();

        let profile = Profile::builtin(Transport::Motorcar);
        let options = RouterOptions::shortest();
        let set = route(
            &graph,
            &profile,
            &options,
            &[
                GeoPoint::new(0.0, 0.00),
                GeoPoint::new(0.0, 0.01),
                GeoPoint::new(1.0, 0.00), // unreachable from island A
                GeoPoint::new(1.0, 0.01),
            ],
        )
        .unwrap();

        assert!(!set.is_complete());
        assert!(set.legs[0].is_some());
        assert!(set.legs[1].is_none());
        assert!(set.legs[2].is_some());
    }

    #[test]
    fn one_waypoint_is_an_error() {
        let (graph, _, _) = line();
        let profile = Profile::builtin(Transport::Motorcar);
        let options = RouterOptions::shortest();
        assert!(matches!(
            route(&graph, &profile, &options, &[GeoPoint::new(0.0, 0.0)]),
            Err(RouterError::TooFewWaypoints)
        ));
    }

    #[test]
    fn cancellation_aborts_the_call() {
        use std::sync::Arc;
        use std::sync::atomic::AtomicBool;

        let (graph, _, _) = line();
        let profile = Profile::builtin(Transport::Motorcar);
        let mut options = RouterOptions::shortest();
        options.cancel = Some(Arc::new(AtomicBool::new(true)));

        assert!(matches!(
            route(
                &graph,
                &profile,
                &options,
                &[GeoPoint::new(0.0, 0.0), GeoPoint::new(0.0, 0.02)]
            ),
            Err(RouterError::Cancelled)
        ));
    }

    #[test]
    fn quickest_prefers_faster_way() {
        // Two parallel paths: a long primary road and a short residential one.
        let mut b = rr_graph::GraphBuilder::new();
        let fast = b.add_way(rr_graph::Way::new(rr_core::Highway::Primary));
        let slow = b.add_way(rr_graph::Way::new(rr_core::Highway::Residential));
        let n0 = b.add_node(GeoPoint::new(0.0, 0.00));
        let n1 = b.add_node(GeoPoint::new(0.0, 0.03));
        let detour = b.add_node(GeoPoint::new(0.02, 0.015));
        b.add_segment(n0, n1, slow); // direct ~3.3 km residential
        b.add_segment(n0, detour, fast); // dog-leg ~5.4 km primary
        b.add_segment(detour, n1, fast);
        let graph = b.build();

        let profile = Profile::builtin(Transport::Motorcar);

        let shortest = route(
            &graph,
            &profile,
            &RouterOptions::shortest(),
            &[GeoPoint::new(0.0, 0.0), GeoPoint::new(0.0, 0.03)],
        )
        .unwrap();
        let quickest = route(
            &graph,
            &profile,
            &RouterOptions::quickest(),
            &[GeoPoint::new(0.0, 0.0), GeoPoint::new(0.0, 0.03)],
        )
        .unwrap();

        // Count the nodes actually on the route (the leg also holds
        // explored-but-unused states).
        let path_len = |set: &crate::RouteSet| {
            let leg = set.legs[0].as_ref().unwrap();
            let mut n = 1;
            let mut rid = leg.find(leg.finish_node, leg.last_segment).unwrap();
            while leg[rid].prev != rr_core::ResultId::INVALID {
                rid = leg[rid].prev;
                n += 1;
            }
            n
        };
        // Shortest takes the direct segment; quickest detours via the
        // primary road's extra node.
        assert_eq!(path_len(&shortest), 2);
        assert_eq!(path_len(&quickest), 3);
    }
}
