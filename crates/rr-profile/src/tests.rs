//! Unit tests for rr-profile.

use rr_core::{Highway, Transport};

use crate::Profile;

#[test]
fn motorcar_defaults() {
    let p = Profile::builtin(Transport::Motorcar);
    assert!(p.allows_highway(Highway::Motorway));
    assert!(p.allows_highway(Highway::Residential));
    assert!(!p.allows_highway(Highway::Cycleway));
    assert!(!p.allows_highway(Highway::Steps));
    assert!(p.oneway);
    assert!(p.turns);
    assert!(!p.uturn);
}

#[test]
fn foot_ignores_oneway_and_may_turn_back() {
    let p = Profile::builtin(Transport::Foot);
    assert!(!p.oneway);
    assert!(p.uturn);
    assert!(!p.allows_highway(Highway::Motorway));
    assert!(p.allows_highway(Highway::Steps));
}

#[test]
fn max_speed_matches_fastest_class() {
    let p = Profile::builtin(Transport::Motorcar);
    assert_eq!(p.max_speed_kph(), 112.0);

    let foot = Profile::builtin(Transport::Foot);
    assert_eq!(foot.max_speed_kph(), 10.0); // ferries carry pedestrians faster
}

#[test]
fn zero_speed_class_is_disallowed_even_if_mask_set() {
    let mut p = Profile::builtin(Transport::Motorcar);
    p.allow |= Highway::Steps.bit();
    assert!(!p.allows_highway(Highway::Steps)); // speed is still 0
}

#[test]
fn hgv_carries_limits() {
    let p = Profile::builtin(Transport::Hgv);
    assert!(p.weight.is_some());
    assert!(p.height.is_some());
}
