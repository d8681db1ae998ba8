//! Edge costs, the shortest/quickest metric, and the A* lower bound.
//!
//! Scores are `f32`: metres under [`Optimise::Shortest`], seconds under
//! [`Optimise::Quickest`].  The heuristic is the great-circle distance to the
//! goal (divided by the profile's maximum speed for durations) — always
//! admissible, so a popped goal state is optimal.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use rr_core::{GeoPoint, SegmentId};
use rr_graph::Way;
use rr_profile::Profile;

use crate::query::QueryGraph;

/// Which metric the search minimises.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub enum Optimise {
    /// Minimise cumulative distance (the default).
    #[default]
    Shortest,
    /// Minimise cumulative duration.
    Quickest,
}

/// Per-call routing options, passed explicitly through every kernel.
#[derive(Clone, Default)]
pub struct RouterOptions {
    pub optimise: Optimise,

    /// Maximum distance a waypoint may be from the network, metres.
    /// 0 selects the default of 1 km.
    pub snap_distance_m: f32,

    /// Cooperative cancellation, checked at the top of each pop-expand
    /// iteration.  `None` means the call runs to completion.
    pub cancel: Option<Arc<AtomicBool>>,
}

impl RouterOptions {
    pub fn shortest() -> RouterOptions {
        RouterOptions { optimise: Optimise::Shortest, ..RouterOptions::default() }
    }

    pub fn quickest() -> RouterOptions {
        RouterOptions { optimise: Optimise::Quickest, ..RouterOptions::default() }
    }

    pub fn snap_distance_m(&self) -> f32 {
        if self.snap_distance_m > 0.0 { self.snap_distance_m } else { 1_000.0 }
    }

    pub fn cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|c| c.load(Ordering::Relaxed))
    }
}

// ── Way admissibility ─────────────────────────────────────────────────────────

/// Can `profile` use `way` at all?  One-way direction and turn restrictions
/// are per-segment concerns checked in the kernels.
pub fn way_allowed(way: &Way, profile: &Profile) -> bool {
    way.transports.contains(profile.transport)
        && profile.allows_highway(way.highway)
        && within_limit(profile.weight, way.weight)
        && within_limit(profile.height, way.height)
        && within_limit(profile.width, way.width)
        && within_limit(profile.length, way.length)
}

/// A way cap of 0 means unrestricted; a profile of `None` ignores caps.
#[inline]
fn within_limit(vehicle: Option<f32>, cap: f32) -> bool {
    cap == 0.0 || vehicle.map_or(true, |v| v <= cap)
}

// ── Costs ─────────────────────────────────────────────────────────────────────

/// Travel time over `distance_m` metres of `way` in seconds.
pub fn segment_duration(distance_m: f32, way: &Way, profile: &Profile) -> f32 {
    let mut speed_kph = profile.speed_kph(way.highway);
    if way.speed_limit > 0.0 {
        speed_kph = speed_kph.min(way.speed_limit);
    }
    distance_m / (speed_kph / 3.6)
}

/// The cost of traversing `seg` under the active metric.
pub fn segment_score(
    q: &QueryGraph<'_>,
    seg: SegmentId,
    profile: &Profile,
    optimise: Optimise,
) -> f32 {
    let distance = q.distance(seg);
    match optimise {
        Optimise::Shortest => distance,
        Optimise::Quickest => segment_duration(distance, q.way(seg), profile),
    }
}

/// Admissible lower bound on the remaining cost from `pos` to `goal`.
pub fn remaining_score(
    pos: GeoPoint,
    goal: GeoPoint,
    profile: &Profile,
    optimise: Optimise,
) -> f32 {
    let distance = pos.distance_m(goal);
    match optimise {
        Optimise::Shortest => distance,
        Optimise::Quickest => distance / (profile.max_speed_kph() / 3.6),
    }
}
