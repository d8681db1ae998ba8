//! The multi-waypoint driver.
//!
//! [`route`] snaps every waypoint, then solves each consecutive pair with the
//! kernels in [`crate::optimise`], linking legs through `prev_segment` so
//! U-turn and turn-restriction rules hold across waypoints.  A pair that
//! cannot be connected leaves a `None` leg and routing continues with the
//! next pair; the caller decides how to surface the gap.

use tracing::{debug, warn};

use rr_core::{GeoPoint, NodeId, SegmentId};
use rr_graph::Graph;
use rr_profile::Profile;

use crate::cost::RouterOptions;
use crate::error::{RouterError, RouterResult};
use crate::fakes::FakeGraph;
use crate::optimise::{
    combine_routes, find_finish_routes, find_middle_route, find_normal_route, find_start_routes,
    fix_forward_route,
};
use crate::query::QueryGraph;
use crate::results::Results;

/// The outcome of one multi-waypoint routing call.
pub struct RouteSet {
    /// One entry per consecutive waypoint pair; `None` where no route exists.
    pub legs: Vec<Option<Results>>,
    /// The fake nodes the annotator needs to resolve synthetic indices.
    pub fakes: FakeGraph,
    /// The node each waypoint snapped to; `None` if it was unsnappable.
    pub waypoint_nodes: Vec<Option<NodeId>>,
}

impl RouteSet {
    /// `true` when every waypoint pair was connected.
    pub fn is_complete(&self) -> bool {
        self.legs.iter().all(Option::is_some)
    }
}

/// Compute routes through `waypoints` in order.
///
/// # Errors
///
/// [`RouterError::TooFewWaypoints`] below two waypoints and
/// [`RouterError::Cancelled`] if the options' cancel flag was raised;
/// unreachable pairs are reported through the [`RouteSet`], not as errors.
pub fn route(
    graph: &Graph,
    profile: &Profile,
    options: &RouterOptions,
    waypoints: &[GeoPoint],
) -> RouterResult<RouteSet> {
    if waypoints.len() < 2 {
        return Err(RouterError::TooFewWaypoints);
    }

    let (fakes, waypoint_nodes) = FakeGraph::snap(graph, waypoints, options.snap_distance_m());
    let mut legs = Vec::with_capacity(waypoints.len() - 1);

    {
        let q = QueryGraph::new(graph, &fakes);
        let mut prev_segment = SegmentId::INVALID;

        for (i, pair) in waypoint_nodes.windows(2).enumerate() {
            let (Some(start), Some(finish)) = (pair[0], pair[1]) else {
                warn!(pair = i, "waypoint not snappable to any segment; skipping pair");
                legs.push(None);
                prev_segment = SegmentId::INVALID;
                continue;
            };

            let leg = if start == finish {
                Some(trivial_leg(start, prev_segment))
            } else {
                find_leg(&q, profile, options, start, prev_segment, finish)
            };
            if options.cancelled() {
                return Err(RouterError::Cancelled);
            }

            match leg {
                Some(mut leg) => {
                    fix_forward_route(&mut leg);
                    prev_segment = leg.last_segment;
                    debug!(pair = i, states = leg.len(), "pair routed");
                    legs.push(Some(leg));
                }
                None => {
                    warn!(pair = i, "no route between waypoint pair");
                    prev_segment = SegmentId::INVALID;
                    legs.push(None);
                }
            }
        }
    }

    Ok(RouteSet { legs, fakes, waypoint_nodes })
}

/// Route one waypoint pair: try the fenced forward search first, fall back
/// to the full normal-graph A* for short routes, otherwise stitch through
/// the overlay.
fn find_leg(
    q: &QueryGraph<'_>,
    profile: &Profile,
    options: &RouterOptions,
    start: NodeId,
    prev_segment: SegmentId,
    finish: NodeId,
) -> Option<Results> {
    let begin = find_start_routes(q, profile, options, start, prev_segment, finish);

    if begin.finish_node != NodeId::INVALID {
        // The finish is inside the start fence: no overlay stitch needed.
        return find_normal_route(q, profile, options, start, prev_segment, finish);
    }

    let end = find_finish_routes(q, profile, options, finish);
    let middle = find_middle_route(q, profile, options, &begin, &end)?;
    combine_routes(q, profile, options, &begin, &middle, &end)
}

/// A start equal to its finish still yields one waypoint event downstream.
fn trivial_leg(node: NodeId, prev_segment: SegmentId) -> Results {
    let mut results = Results::new(8);
    results.start_node = node;
    results.prev_segment = prev_segment;
    results.insert(node, prev_segment);
    results.finish_node = node;
    results.last_segment = prev_segment;
    results
}
