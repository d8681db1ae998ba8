//! Unit tests for rr-core primitives.

#[cfg(test)]
mod ids {
    use crate::{NodeId, ResultId, SegmentId};

    #[test]
    fn index_roundtrip() {
        let id = NodeId(42);
        assert_eq!(id.index(), 42);
        assert_eq!(NodeId::try_from(42usize).unwrap(), id);
    }

    #[test]
    fn invalid_sentinels_are_max() {
        assert_eq!(NodeId::INVALID.0, u32::MAX);
        assert_eq!(SegmentId::INVALID.0, u32::MAX);
        assert_eq!(ResultId::INVALID.0, u32::MAX);
    }

    #[test]
    fn fake_nodes() {
        let f = NodeId::fake(3);
        assert!(f.is_fake());
        assert_eq!(f.fake_index(), 3);
        assert!(!NodeId(17).is_fake());
        // The sentinel is not a fake node even though it sits above the base.
        assert!(!NodeId::INVALID.is_fake());
    }

    #[test]
    fn fake_segments() {
        let s = SegmentId::fake(7);
        assert!(s.is_fake());
        assert_eq!(s.fake_index(), 7);
        assert!(!SegmentId(0).is_fake());
    }

    #[test]
    fn display() {
        assert_eq!(NodeId(7).to_string(), "NodeId(7)");
    }
}

#[cfg(test)]
mod geo {
    use crate::GeoPoint;
    use crate::geo::{normalize_deg, turn_angle_deg};

    #[test]
    fn zero_distance() {
        let p = GeoPoint::new(51.5, -0.1);
        assert!(p.distance_m(p) < 0.01);
    }

    #[test]
    fn one_degree_latitude() {
        // ~1 degree of latitude ≈ 111 km
        let a = GeoPoint::new(51.0, 0.0);
        let b = GeoPoint::new(52.0, 0.0);
        let d = a.distance_m(b);
        assert!((d - 111_195.0).abs() < 500.0, "got {d}");
    }

    #[test]
    fn bearing_cardinals() {
        let origin = GeoPoint::new(0.0, 0.0);
        assert!(origin.bearing_deg(GeoPoint::new(1.0, 0.0)).abs() < 0.5); // north
        assert!((origin.bearing_deg(GeoPoint::new(0.0, 1.0)) - 90.0).abs() < 0.5); // east
        assert!((origin.bearing_deg(GeoPoint::new(-1.0, 0.0)).abs() - 180.0).abs() < 0.5); // south
        assert!((origin.bearing_deg(GeoPoint::new(0.0, -1.0)) + 90.0).abs() < 0.5); // west
    }

    #[test]
    fn normalize_wraps() {
        assert_eq!(normalize_deg(190.0), -170.0);
        assert_eq!(normalize_deg(-190.0), 170.0);
        assert_eq!(normalize_deg(0.0), 0.0);
        assert_eq!(normalize_deg(180.0), -180.0);
    }

    #[test]
    fn right_angle_turn() {
        // Heading north, then east: a +90° (right) turn.
        assert!((turn_angle_deg(0.0, 90.0) - 90.0).abs() < 0.01);
        // Heading east, then north: a -90° (left) turn.
        assert!((turn_angle_deg(90.0, 0.0) + 90.0).abs() < 0.01);
    }

    #[test]
    fn projection_midpoint() {
        let a = GeoPoint::new(0.0, 0.0);
        let b = GeoPoint::new(0.0, 1.0);
        let p = GeoPoint::new(0.1, 0.5);
        let (t, on) = p.project_onto(a, b);
        assert!((t - 0.5).abs() < 0.01);
        assert!(on.lat.abs() < 1e-6);
        assert!((on.lon - 0.5).abs() < 0.01);
    }

    #[test]
    fn projection_clamps_to_endpoints() {
        let a = GeoPoint::new(0.0, 0.0);
        let b = GeoPoint::new(0.0, 1.0);
        let (t0, _) = GeoPoint::new(0.0, -0.5).project_onto(a, b);
        let (t1, _) = GeoPoint::new(0.0, 1.5).project_onto(a, b);
        assert_eq!(t0, 0.0);
        assert_eq!(t1, 1.0);
    }
}

#[cfg(test)]
mod highway {
    use crate::Highway;

    #[test]
    fn name_roundtrip() {
        for h in Highway::ALL {
            assert_eq!(Highway::from_name(h.as_str()), Some(h));
        }
        assert_eq!(Highway::from_name("goat-track"), None);
    }

    #[test]
    fn importance_is_lower_triangular() {
        // A residential branch is not worth a mention from a motorway...
        assert!(!Highway::Motorway.junction_important(Highway::Residential));
        // ...but a motorway branch always is.
        assert!(Highway::Residential.junction_important(Highway::Motorway));
        // Same class is always important.
        for h in Highway::ALL {
            assert!(h.junction_important(h));
        }
    }

    #[test]
    fn ferries_and_footpaths() {
        // Ferry terminals are always mentioned.
        assert!(Highway::Motorway.junction_important(Highway::Ferry));
        // On a path, even steps are worth a mention.
        assert!(Highway::Path.junction_important(Highway::Steps));
    }
}

#[cfg(test)]
mod transport {
    use crate::{Transport, Transports};

    #[test]
    fn name_roundtrip() {
        for t in Transport::ALL {
            assert_eq!(Transport::from_name(t.as_str()), Some(t));
        }
    }

    #[test]
    fn mask_operations() {
        let m: Transports = [Transport::Foot, Transport::Bicycle].into_iter().collect();
        assert!(m.contains(Transport::Foot));
        assert!(m.contains(Transport::Bicycle));
        assert!(!m.contains(Transport::Motorcar));
        assert!(Transports::ALL.contains(Transport::Psv));
        assert!(!Transports::NONE.contains(Transport::Foot));
    }
}
