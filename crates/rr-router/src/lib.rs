//! `rr-router` — the graph-search engine.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                  |
//! |--------------|-----------------------------------------------------------|
//! | [`results`]  | `Results` path-state arena, `PathState`                   |
//! | [`queue`]    | 1-indexed binary min-heap with back-indexed decrease-key  |
//! | [`cost`]     | `Optimise`, `RouterOptions`, edge costs, A* lower bound   |
//! | [`fakes`]    | `FakeGraph` — synthetic nodes for mid-segment waypoints   |
//! | [`query`]    | `QueryGraph` — graph + fakes facade the kernels search    |
//! | [`optimise`] | The six kernels, from fenced forward search to stitching  |
//! | [`router`]   | `route` — the multi-waypoint driver, `RouteSet`           |
//! | [`error`]    | `RouterError`, `RouterResult<T>`                          |
//!
//! # Concurrency
//!
//! One routing call is single-threaded and owns its `Results`, `Queue`, and
//! `FakeGraph` exclusively; the `Graph` is shared read-only.  Run concurrent
//! calls by giving each its own options and scratch state.

pub mod cost;
pub mod error;
pub mod fakes;
pub mod optimise;
pub mod query;
pub mod queue;
pub mod results;
pub mod router;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use cost::{Optimise, RouterOptions, segment_duration, segment_score, way_allowed};
pub use error::{RouterError, RouterResult};
pub use fakes::{FakeGraph, FakeNode};
pub use optimise::{
    combine_routes, find_finish_routes, find_middle_route, find_normal_route, find_start_routes,
    fix_forward_route,
};
pub use query::QueryGraph;
pub use queue::Queue;
pub use results::{NOT_QUEUED, PathState, Results};
pub use router::{RouteSet, route};
