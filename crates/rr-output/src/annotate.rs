//! Route annotation: classifying every visited node by how much narration it
//! deserves.
//!
//! The annotator walks the forward-linked chains a routing call produced and
//! emits one [`RoutePoint`] per visited node.  Junction analysis looks at the
//! branches *not* taken: a branch of comparable-or-higher class makes the
//! junction worth describing, a mere change of highway class is noted, and
//! degree-2 through-nodes stay silent.  Roundabouts are tracked with a
//! counter so the exit taken can be announced by ordinal.

use rr_core::geo::turn_angle_deg;
use rr_core::{GeoPoint, Highway, NodeId, ResultId, SegmentId};
use rr_graph::Graph;
use rr_profile::Profile;
use rr_router::{FakeGraph, QueryGraph, Results, segment_duration};

// ── Classification ────────────────────────────────────────────────────────────

/// How much a visited node matters to the narration, least to most.
///
/// The declaration order is meaningful: junction analysis keeps the highest
/// classification that applies, and writers include a point in the turn-by-
/// turn output when it ranks above [`Importance::JunctCont`].
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub enum Importance {
    /// Internal stitching point (the repeated start of a later leg).
    Ignore,
    /// A degree-2 through-node.
    Unimportant,
    /// A roundabout exit that is not taken.
    RbNotExit,
    /// A junction the route passes without comment.
    JunctCont,
    /// The highway class changes but nothing else happens.
    Change,
    /// A junction worth describing.
    JunctImport,
    /// Entering a roundabout.
    RbEntry,
    /// Leaving a roundabout.
    RbExit,
    /// A mini-roundabout.
    MiniRb,
    /// Doubling back along the arrival segment.
    Uturn,
    /// A user-supplied waypoint.
    Waypoint,
}

/// One annotated point of the route, consumed by the output writers.
#[derive(Clone, Debug)]
pub struct RoutePoint {
    pub position: GeoPoint,
    /// Real node index, or a fake index for a mid-segment waypoint.
    pub node: NodeId,
    /// Index of the waypoint pair this point belongs to.
    pub leg: usize,
    pub importance: Importance,

    /// Arrival-segment measures; zero at the first point of a leg.
    pub seg_distance_m: f32,
    pub seg_duration_s: f32,
    pub cum_distance_m: f32,
    pub cum_duration_s: f32,

    /// Profile speed on the arrival way, km/h (0 at the first point).
    pub speed_kph: f32,
    /// Compass bearing of the arrival segment, 0–359°.
    pub bearing_deg: i32,
    /// Class and name of the arrival way.
    pub highway: Option<Highway>,
    pub way_name: String,

    /// Turn onto the departure segment, −180…180° (negative = left), and the
    /// departure bearing, 0–359°.  Present when there is a next segment.
    pub turn_deg: Option<i32>,
    pub next_bearing_deg: Option<i32>,
    pub next_highway: Option<Highway>,
    pub next_way_name: Option<String>,

    /// For [`Importance::RbExit`]: 1-based ordinal of the exit taken.
    pub rb_exit_ordinal: Option<usize>,

    /// The route's super nodes are marked in the full text output.
    pub super_node: bool,
}

// ── Annotation ────────────────────────────────────────────────────────────────

/// Walk the per-pair chains and produce the annotated event stream.
///
/// `legs` entries that are `None` (unroutable pairs) appear as gaps: the
/// stream simply continues with the next routed pair.
pub fn annotate_route(
    graph: &Graph,
    fakes: &FakeGraph,
    legs: &[Option<Results>],
    profile: &Profile,
) -> Vec<RoutePoint> {
    let q = QueryGraph::new(graph, fakes);

    // Flatten each leg into its forward chain of states.
    let chains: Vec<(usize, &Results, Vec<ResultId>)> = legs
        .iter()
        .enumerate()
        .filter_map(|(i, leg)| leg.as_ref().map(|l| (i, l, forward_chain(l))))
        .collect();

    let mut points = Vec::new();
    let mut cum_distance = 0.0f32;
    let mut cum_duration = 0.0f32;
    let mut important_points = 0u32;
    let mut roundabout = 0usize;

    for (chain_idx, (leg_idx, leg, chain)) in chains.iter().enumerate() {
        let leg = *leg;

        for (j, &rid) in chain.iter().enumerate() {
            let state = &leg[rid];
            let node = state.node;
            let position = q.position(node);

            // Arrival segment (absent at the first point of each leg — a
            // later leg's start repeats the previous finish).
            let arrival = (j > 0).then_some(state.segment);
            let (seg_distance_m, seg_duration_s, highway, way_name, speed_kph, bearing_deg) =
                match arrival {
                    Some(seg) => {
                        let way = q.way(seg);
                        let dist = q.distance(seg);
                        let dur = segment_duration(dist, way, profile);
                        let from = q.other_node(seg, node);
                        let bearing = compass(q.position(from).bearing_deg(position));
                        (dist, dur, Some(way.highway), way.name.clone(), profile.speed_kph(way.highway), bearing)
                    }
                    None => (0.0, 0.0, None, String::new(), 0.0, 0),
                };
            cum_distance += seg_distance_m;
            cum_duration += seg_duration_s;

            // The following state, crossing into the next routed leg when
            // this chain ends.
            let next = if j + 1 < chain.len() {
                Some((leg, chain[j + 1]))
            } else {
                chains[chain_idx + 1..]
                    .iter()
                    .find(|(_, _, c)| c.len() > 1)
                    .map(|(_, l, c)| (*l, c[1]))
            };
            let next_state = next.map(|(l, id)| &l[id]);

            // ── Roundabout tracking ───────────────────────────────────────
            let mut importance = Importance::Unimportant;
            let mut rb_exit_ordinal = None;

            if let Some(ns) = next_state {
                if q.way(ns.segment).roundabout {
                    if roundabout == 0 {
                        roundabout = 1;
                        importance = Importance::RbEntry;
                    } else if let Some(seg) = arrival {
                        let prev_node = prev_node_of(leg, rid);
                        for branch in q.segments_at(node) {
                            if branch.is_fake() {
                                continue;
                            }
                            let other = q.other_node(branch, node);
                            if Some(other) == prev_node
                                || q.real_segment(branch) == q.real_segment(seg)
                            {
                                continue;
                            }
                            if !q.is_normal_segment(branch)
                                || (profile.oneway && q.is_oneway_towards(branch, node))
                            {
                                continue;
                            }
                            if !q.way(branch).roundabout && other != ns.node {
                                roundabout += 1;
                                importance = Importance::RbNotExit;
                            }
                        }
                    }
                } else if roundabout > 0 {
                    roundabout += 1;
                    importance = Importance::RbExit;
                    rb_exit_ordinal = Some(roundabout - 1);
                }
            }

            // ── Junction classification ───────────────────────────────────
            if importance == Importance::Unimportant && roundabout == 0 {
                importance = classify(
                    &q,
                    profile,
                    leg,
                    rid,
                    j,
                    chain.len(),
                    important_points,
                    arrival,
                    next_state.map(|s| (s.node, s.segment)),
                );
            }

            // ── Turn geometry towards the next segment ────────────────────
            let (turn_deg, next_bearing_deg, next_highway, next_way_name) = match next_state {
                Some(ns) => {
                    // `ns.node` is the far end of the departure segment.
                    let depart = position.bearing_deg(q.position(ns.node));
                    let turn = arrival.map(|seg| {
                        let from = q.other_node(seg, node);
                        let arrive = q.position(from).bearing_deg(position);
                        turn_angle_deg(arrive, depart).round() as i32
                    });
                    let way = q.way(ns.segment);
                    (turn, Some(compass(depart)), Some(way.highway), Some(way.name.clone()))
                }
                None => (None, None, None, None),
            };

            if importance > Importance::JunctCont {
                important_points += 1;
                if roundabout > 1 {
                    roundabout = 0;
                }
            }

            points.push(RoutePoint {
                position,
                node,
                leg: *leg_idx,
                importance,
                seg_distance_m,
                seg_duration_s,
                cum_distance_m: cum_distance,
                cum_duration_s: cum_duration,
                speed_kph,
                bearing_deg,
                highway,
                way_name,
                turn_deg,
                next_bearing_deg,
                next_highway,
                next_way_name,
                rb_exit_ordinal,
                super_node: !node.is_fake() && graph.is_super_node(node),
            });
        }
    }

    points
}

/// Decide the non-roundabout importance of a mid-route node.
#[allow(clippy::too_many_arguments)]
fn classify(
    q: &QueryGraph<'_>,
    profile: &Profile,
    leg: &Results,
    rid: ResultId,
    j: usize,
    chain_len: usize,
    important_points: u32,
    arrival: Option<SegmentId>,
    next: Option<(NodeId, SegmentId)>,
) -> Importance {
    let node = leg[rid].node;

    if important_points == 0 {
        return Importance::Waypoint; // first point overall
    }
    if j == chain_len - 1 {
        return Importance::Waypoint; // the pair's finish
    }
    if j == 0 {
        return Importance::Ignore; // repeated start of a later leg
    }

    let (Some(seg), Some((next_node, next_seg))) = (arrival, next) else {
        return Importance::Unimportant;
    };

    if q.real_segment(seg) == q.real_segment(next_seg) {
        return Importance::Uturn;
    }
    if q.is_mini_roundabout(node) {
        return Importance::MiniRb;
    }

    let arrival_hw = q.way(seg).highway;
    let prev_node = prev_node_of(leg, rid);
    let mut importance = Importance::Unimportant;

    for branch in q.segments_at(node) {
        if branch.is_fake() {
            continue;
        }
        let other = q.other_node(branch, node);
        if Some(other) == prev_node || q.real_segment(branch) == q.real_segment(seg) {
            continue;
        }
        if !q.is_normal_segment(branch) || (profile.oneway && q.is_oneway_towards(branch, node)) {
            continue;
        }

        let branch_hw = q.way(branch).highway;
        if other == next_node && !next_node.is_fake() {
            // The branch we follow: only a class change is worth noting.
            if branch_hw != arrival_hw {
                importance = importance.max(Importance::Change);
            }
        } else if next_node.is_fake() {
            // The continuation leaves through a fake half; branches cannot
            // be compared against it.
        } else {
            if arrival_hw.junction_important(branch_hw) {
                importance = importance.max(Importance::JunctImport);
            }
            importance = importance.max(Importance::JunctCont);
        }
    }

    importance
}

/// The node the chain arrived from, one state back.
fn prev_node_of(leg: &Results, rid: ResultId) -> Option<NodeId> {
    let prev = leg[rid].prev;
    (prev != ResultId::INVALID).then(|| leg[prev].node)
}

/// The forward chain of a routed leg, start state first.
fn forward_chain(leg: &Results) -> Vec<ResultId> {
    let mut chain = Vec::new();
    let Some(start) = leg.find(leg.start_node, leg.prev_segment) else {
        return chain;
    };
    let mut rid = start;
    loop {
        chain.push(rid);
        let next = leg[rid].next;
        if next == ResultId::INVALID {
            break;
        }
        rid = next;
    }
    chain
}

/// Fold a [-180, 180) bearing into compass degrees 0–359.
fn compass(bearing: f32) -> i32 {
    let deg = bearing.round() as i32;
    if deg < 0 { deg + 360 } else { deg % 360 }
}

// ── Quantisation ──────────────────────────────────────────────────────────────

/// Bucket a turn angle into one of eight 45° sectors; index 4 is straight on.
pub fn turn_index(turn_deg: i32) -> usize {
    (((202 + turn_deg) / 45) % 8) as usize
}

/// Bucket a 0–359° compass bearing into one of eight 45° sectors; index 4 is
/// north.
pub fn heading_index(bearing_deg: i32) -> usize {
    ((4 + (22 + bearing_deg) / 45) % 8) as usize
}
