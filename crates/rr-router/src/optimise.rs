//! The search kernels.
//!
//! A waypoint pair is routed in two ways.  When the endpoints are close, a
//! single A* over the normal graph ([`find_normal_route`]) suffices.  For
//! longer routes the search is stitched through the contracted overlay:
//! [`find_start_routes`] fans out forwards until it is fenced in by super
//! nodes, [`find_finish_routes`] does the same backwards from the finish,
//! [`find_middle_route`] runs A* over super segments between the two fences,
//! and [`combine_routes`] expands the winning shortcut chain back into real
//! nodes.  [`fix_forward_route`] then turns the `prev` chain into a
//! doubly-linked one for the annotator.
//!
//! All kernels treat the profile's one-way obedience, U-turn permission, and
//! turn restrictions identically; an edge rejected here is rejected
//! everywhere.

use tracing::debug;

use rr_core::{GeoPoint, NodeId, ResultId, SegmentId};
use rr_profile::Profile;

use crate::cost::{RouterOptions, remaining_score, segment_score, way_allowed};
use crate::query::QueryGraph;
use crate::queue::Queue;
use crate::results::Results;

// ── Edge admissibility ────────────────────────────────────────────────────────

/// May the search leave `node` by `seg`, having arrived by `prev_seg`?
fn can_leave_by(
    q: &QueryGraph<'_>,
    profile: &Profile,
    prev_seg: SegmentId,
    node: NodeId,
    seg: SegmentId,
) -> bool {
    if profile.oneway && q.is_oneway_towards(seg, node) {
        return false;
    }
    if !way_allowed(q.way(seg), profile) {
        return false;
    }
    if prev_seg != SegmentId::INVALID {
        if q.real_segment(seg) == q.real_segment(prev_seg) && !profile.uturn {
            return false;
        }
        if profile.turns && !q.turn_allowed(prev_seg, node, seg) {
            return false;
        }
    }
    true
}

/// Record that (`node`, `seg`) is reachable from `from` at `score`, keeping
/// only improvements, and (re)queue it keyed by `score` plus the lower bound
/// to `goal` (plain Dijkstra when `goal` is `None`).
#[allow(clippy::too_many_arguments)]
fn relax(
    q: &QueryGraph<'_>,
    profile: &Profile,
    options: &RouterOptions,
    results: &mut Results,
    queue: &mut Queue,
    from: ResultId,
    node: NodeId,
    seg: SegmentId,
    score: f32,
    goal: Option<GeoPoint>,
) {
    let id = match results.find(node, seg) {
        Some(id) if results[id].score <= score => return,
        Some(id) => id,
        None => results.insert(node, seg),
    };

    results[id].score = score;
    results[id].prev = from;
    results[id].sortby = match goal {
        Some(goal) => score + remaining_score(q.position(node), goal, profile, options.optimise),
        None => score,
    };
    queue.insert(results, id);
}

// ── Forward kernel: start → super fence ───────────────────────────────────────

/// Best-first expansion from `start` over the normal graph, retaining every
/// super node reached as a candidate entry into the overlay and stopping
/// early if `finish` itself is popped (recorded in `finish_node`).
///
/// `prev_segment` is the segment the previous waypoint leg arrived by; it
/// blocks an immediate U-turn and participates in turn restrictions at the
/// start node.
pub fn find_start_routes(
    q: &QueryGraph<'_>,
    profile: &Profile,
    options: &RouterOptions,
    start: NodeId,
    prev_segment: SegmentId,
    finish: NodeId,
) -> Results {
    let mut results = Results::new(64);
    results.start_node = start;
    results.prev_segment = prev_segment;

    let goal = q.position(finish);
    let mut queue = Queue::new();

    let origin = results.insert(start, prev_segment);
    results[origin].sortby = remaining_score(q.position(start), goal, profile, options.optimise);
    queue.insert(&mut results, origin);

    while let Some(rid) = queue.pop(&mut results) {
        if options.cancelled() {
            break;
        }

        let node = results[rid].node;
        let in_seg = results[rid].segment;
        let score = results[rid].score;

        if node == finish {
            results.finish_node = node;
            results.last_segment = in_seg;
            break;
        }

        // Retain super nodes as stitching candidates; never expand past them.
        if q.is_super_node(node) && node != start {
            continue;
        }

        for seg in q.segments_at(node) {
            if !q.is_normal_segment(seg) {
                continue;
            }
            if !can_leave_by(q, profile, in_seg, node, seg) {
                continue;
            }
            let other = q.other_node(seg, node);
            let new_score = score + segment_score(q, seg, profile, options.optimise);
            relax(q, profile, options, &mut results, &mut queue, rid, other, seg, new_score, Some(goal));
        }
    }

    debug!(states = results.len(), direct = results.finish_node != NodeId::INVALID, "start routes found");
    results
}

// ── Backward kernel: super fence → finish ─────────────────────────────────────

/// Backward best-first expansion from `finish` over the normal graph.
///
/// States are keyed by (node, **outgoing** segment towards the finish) and
/// scores are costs-to-finish; `prev` points at the state one segment nearer
/// the finish.  Super nodes are retained without expansion, mirroring
/// [`find_start_routes`].
pub fn find_finish_routes(
    q: &QueryGraph<'_>,
    profile: &Profile,
    options: &RouterOptions,
    finish: NodeId,
) -> Results {
    let mut results = Results::new(64);
    results.finish_node = finish;

    let mut queue = Queue::new();
    let seed = results.insert(finish, SegmentId::INVALID);
    queue.insert(&mut results, seed);

    while let Some(rid) = queue.pop(&mut results) {
        if options.cancelled() {
            break;
        }

        let node = results[rid].node;
        let out_seg = results[rid].segment;
        let score = results[rid].score;

        if q.is_super_node(node) && node != finish {
            continue;
        }

        for seg in q.segments_at(node) {
            if !q.is_normal_segment(seg) {
                continue;
            }
            let m = q.other_node(seg, node);

            // The candidate is traversed m → node.
            if profile.oneway && q.is_oneway_towards(seg, m) {
                continue;
            }
            if !way_allowed(q.way(seg), profile) {
                continue;
            }
            if out_seg != SegmentId::INVALID {
                if q.real_segment(seg) == q.real_segment(out_seg) && !profile.uturn {
                    continue;
                }
                if profile.turns && !q.turn_allowed(seg, node, out_seg) {
                    continue;
                }
            }

            let new_score = score + segment_score(q, seg, profile, options.optimise);
            relax(q, profile, options, &mut results, &mut queue, rid, m, seg, new_score, None);
        }
    }

    debug!(states = results.len(), "finish routes found");
    results
}

// ── Normal-graph A* ───────────────────────────────────────────────────────────

/// A* from `start` to `finish` over the normal graph alone, with no
/// super-node fence.  Used for short routes and to expand super shortcuts
/// during [`combine_routes`].
pub fn find_normal_route(
    q: &QueryGraph<'_>,
    profile: &Profile,
    options: &RouterOptions,
    start: NodeId,
    prev_segment: SegmentId,
    finish: NodeId,
) -> Option<Results> {
    let mut results = Results::new(64);
    results.start_node = start;
    results.prev_segment = prev_segment;

    let goal = q.position(finish);
    let mut queue = Queue::new();

    let origin = results.insert(start, prev_segment);
    results[origin].sortby = remaining_score(q.position(start), goal, profile, options.optimise);
    queue.insert(&mut results, origin);

    while let Some(rid) = queue.pop(&mut results) {
        if options.cancelled() {
            return None;
        }

        let node = results[rid].node;
        let in_seg = results[rid].segment;
        let score = results[rid].score;

        if node == finish {
            results.finish_node = node;
            results.last_segment = in_seg;
            return Some(results);
        }

        for seg in q.segments_at(node) {
            if !q.is_normal_segment(seg) {
                continue;
            }
            if !can_leave_by(q, profile, in_seg, node, seg) {
                continue;
            }
            let other = q.other_node(seg, node);
            let new_score = score + segment_score(q, seg, profile, options.optimise);
            relax(q, profile, options, &mut results, &mut queue, rid, other, seg, new_score, Some(goal));
        }
    }

    None
}

// ── Overlay A* ────────────────────────────────────────────────────────────────

/// A* over super segments, seeded with the super-node states `begin` found
/// and terminating on the first popped node with a restriction-compatible
/// state in `end`.  The meeting node and its incoming segment are recorded
/// in `finish_node` / `last_segment`.
pub fn find_middle_route(
    q: &QueryGraph<'_>,
    profile: &Profile,
    options: &RouterOptions,
    begin: &Results,
    end: &Results,
) -> Option<Results> {
    let mut results = Results::new(1024);
    results.start_node = begin.start_node;
    results.prev_segment = begin.prev_segment;

    let goal = q.position(end.finish_node);
    let mut queue = Queue::new();

    for bid in begin.iter() {
        let node = begin[bid].node;
        if !q.is_super_node(node) {
            continue;
        }
        let id = results.insert(node, begin[bid].segment);
        results[id].score = begin[bid].score;
        results[id].sortby = begin[bid].score
            + remaining_score(q.position(node), goal, profile, options.optimise);
        queue.insert(&mut results, id);
    }

    while let Some(rid) = queue.pop(&mut results) {
        if options.cancelled() {
            return None;
        }

        let node = results[rid].node;
        let in_seg = results[rid].segment;
        let score = results[rid].score;

        if finish_continuation(q, profile, end, node, in_seg).is_some() {
            results.finish_node = node;
            results.last_segment = in_seg;
            debug!(states = results.len(), "middle route met finish set");
            return Some(results);
        }

        for seg in q.segments_at(node) {
            if !q.is_super_segment(seg) {
                continue;
            }
            if !can_leave_by(q, profile, in_seg, node, seg) {
                continue;
            }
            let other = q.other_node(seg, node);
            let new_score = score + segment_score(q, seg, profile, options.optimise);
            relax(q, profile, options, &mut results, &mut queue, rid, other, seg, new_score, Some(goal));
        }
    }

    None
}

/// The cheapest `end`-side state at `node` whose outgoing segment is a legal
/// continuation after arriving by `in_seg`.
pub(crate) fn finish_continuation(
    q: &QueryGraph<'_>,
    profile: &Profile,
    end: &Results,
    node: NodeId,
    in_seg: SegmentId,
) -> Option<ResultId> {
    end.find_all(node)
        .filter(|&eid| {
            let out = end[eid].segment;
            if out == SegmentId::INVALID || in_seg == SegmentId::INVALID {
                return true; // the node is the finish itself, or the route starts here
            }
            if q.real_segment(out) == q.real_segment(in_seg) && !profile.uturn {
                return false;
            }
            !profile.turns || q.turn_allowed(in_seg, node, out)
        })
        .min_by(|&a, &b| end[a].score.total_cmp(&end[b].score))
}

// ── Composition ───────────────────────────────────────────────────────────────

/// Stitch `begin` + `middle` + `end` into one linear chain of real nodes and
/// segments, expanding every pure super shortcut by re-solving the underlying
/// normal-graph path between its endpoints.  Scores are re-accumulated from
/// the cost model as segments are appended.
pub fn combine_routes(
    q: &QueryGraph<'_>,
    profile: &Profile,
    options: &RouterOptions,
    begin: &Results,
    middle: &Results,
    end: &Results,
) -> Option<Results> {
    // Middle chain: meeting node back to the seed super node.
    let mut hops = Vec::new();
    let mut mid = middle.find(middle.finish_node, middle.last_segment)?;
    loop {
        hops.push(mid);
        let prev = middle[mid].prev;
        if prev == ResultId::INVALID {
            break;
        }
        mid = prev;
    }
    hops.reverse();

    // Begin chain: start up to the seed.
    let seed_node = middle[hops[0]].node;
    let seed_segment = middle[hops[0]].segment;
    let mut chain = Vec::new();
    let mut bid = begin.find(seed_node, seed_segment)?;
    loop {
        chain.push(bid);
        let prev = begin[bid].prev;
        if prev == ResultId::INVALID {
            break;
        }
        bid = prev;
    }
    chain.reverse();

    let mut combined = Results::new(256);
    combined.start_node = begin.start_node;
    combined.prev_segment = begin.prev_segment;

    let mut score = 0.0;
    let mut last = ResultId::INVALID;
    for (i, &bid) in chain.iter().enumerate() {
        let node = begin[bid].node;
        let segment = begin[bid].segment;
        if i > 0 {
            score += segment_score(q, segment, profile, options.optimise);
        }
        last = append(&mut combined, node, segment, score, last);
    }

    // Middle hops.  A hop whose segment is also a road segment is appended
    // directly; a pure shortcut is expanded against the normal graph.
    for &hid in &hops[1..] {
        let hop_node = middle[hid].node;
        let hop_seg = middle[hid].segment;

        if q.is_normal_segment(hop_seg) {
            score += segment_score(q, hop_seg, profile, options.optimise);
            last = append(&mut combined, hop_node, hop_seg, score, last);
        } else {
            let from = combined[last].node;
            let prev_seg = combined[last].segment;
            let sub = find_normal_route(q, profile, options, from, prev_seg, hop_node)?;

            let mut sub_chain = Vec::new();
            let mut sid = sub.find(sub.finish_node, sub.last_segment)?;
            loop {
                sub_chain.push(sid);
                let prev = sub[sid].prev;
                if prev == ResultId::INVALID {
                    break;
                }
                sid = prev;
            }
            sub_chain.reverse();

            // Skip the sub-search's origin state; its node is already present.
            for &sid in &sub_chain[1..] {
                let node = sub[sid].node;
                let segment = sub[sid].segment;
                score += segment_score(q, segment, profile, options.optimise);
                last = append(&mut combined, node, segment, score, last);
            }
        }
    }

    // End chain: meeting node down to the finish.
    let meeting = middle.finish_node;
    let in_seg = combined[last].segment;
    let mut eid = finish_continuation(q, profile, end, meeting, in_seg)?;
    loop {
        let out = end[eid].segment;
        if out == SegmentId::INVALID {
            break;
        }
        let next_node = q.other_node(out, end[eid].node);
        score += segment_score(q, out, profile, options.optimise);
        last = append(&mut combined, next_node, out, score, last);

        let prev = end[eid].prev;
        if prev == ResultId::INVALID {
            break;
        }
        eid = prev;
    }

    combined.finish_node = combined[last].node;
    combined.last_segment = combined[last].segment;
    Some(combined)
}

fn append(
    results: &mut Results,
    node: NodeId,
    segment: SegmentId,
    score: f32,
    prev: ResultId,
) -> ResultId {
    let id = results.get_or_insert(node, segment);
    results[id].score = score;
    results[id].prev = prev;
    id
}

// ── Forward fix ───────────────────────────────────────────────────────────────

/// Install `next` pointers by walking the `prev` chain from the finish state
/// back to the start, making the chain walkable in both directions.
pub fn fix_forward_route(results: &mut Results) {
    let Some(mut rid) = results.find(results.finish_node, results.last_segment) else {
        return;
    };

    loop {
        let prev = results[rid].prev;
        if prev == ResultId::INVALID {
            break;
        }
        results[prev].next = rid;
        rid = prev;
    }
}
