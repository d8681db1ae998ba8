//! A routing-call view of the graph: the read-only [`Graph`] overlaid with
//! the call's [`FakeGraph`].
//!
//! Kernels and the annotator go through this facade so fake nodes and
//! half-segments behave exactly like real ones: adjacency at a split
//! segment's endpoints includes the half leading to the fake node, and
//! attribute lookups (way, distance, one-way) resolve through the parent.

use rr_core::{GeoPoint, NodeId, SegmentId};
use rr_graph::{Graph, Way};

use crate::fakes::FakeGraph;

/// Borrowed view combining the static graph with per-call fakes.
#[derive(Copy, Clone)]
pub struct QueryGraph<'a> {
    pub graph: &'a Graph,
    pub fakes: &'a FakeGraph,
}

impl<'a> QueryGraph<'a> {
    pub fn new(graph: &'a Graph, fakes: &'a FakeGraph) -> QueryGraph<'a> {
        QueryGraph { graph, fakes }
    }

    // ── Nodes ─────────────────────────────────────────────────────────────

    pub fn position(&self, node: NodeId) -> GeoPoint {
        if node.is_fake() {
            self.fakes.position(node)
        } else {
            self.graph.position(node)
        }
    }

    pub fn is_super_node(&self, node: NodeId) -> bool {
        !node.is_fake() && self.graph.is_super_node(node)
    }

    pub fn is_mini_roundabout(&self, node: NodeId) -> bool {
        !node.is_fake() && self.graph.is_mini_roundabout(node)
    }

    /// Segments usable at `node`, including fake halves.
    pub fn segments_at(&self, node: NodeId) -> impl Iterator<Item = SegmentId> + '_ {
        let real = if node.is_fake() {
            None
        } else {
            Some(self.graph.segments_at(node))
        };
        real.into_iter()
            .flatten()
            .chain(self.fakes.segments_touching(node))
    }

    // ── Segments ──────────────────────────────────────────────────────────

    pub fn other_node(&self, seg: SegmentId, node: NodeId) -> NodeId {
        if seg.is_fake() {
            let (real_end, fake) = self.fakes.endpoints(seg);
            if node == fake { real_end } else { fake }
        } else {
            self.graph.other_node(seg, node)
        }
    }

    pub fn distance(&self, seg: SegmentId) -> f32 {
        if seg.is_fake() {
            self.fakes.distance(seg)
        } else {
            self.graph.distance(seg)
        }
    }

    pub fn way(&self, seg: SegmentId) -> &'a Way {
        self.graph.way(self.real_segment(seg))
    }

    /// The underlying real segment: identity for real ids, the parent for
    /// fake halves.  Annotation and U-turn detection compare these.
    pub fn real_segment(&self, seg: SegmentId) -> SegmentId {
        if seg.is_fake() {
            self.fakes.real_segment(seg)
        } else {
            seg
        }
    }

    pub fn is_normal_segment(&self, seg: SegmentId) -> bool {
        seg.is_fake() || self.graph.is_normal_segment(seg)
    }

    pub fn is_super_segment(&self, seg: SegmentId) -> bool {
        !seg.is_fake() && self.graph.is_super_segment(seg)
    }

    pub fn is_oneway_towards(&self, seg: SegmentId, node: NodeId) -> bool {
        if seg.is_fake() {
            self.fakes.is_oneway_towards(self.graph, seg, node)
        } else {
            self.graph.is_oneway_towards(seg, node)
        }
    }

    // ── Turn restrictions ─────────────────────────────────────────────────

    /// Restriction check with fake segments resolved to their parents; fake
    /// via nodes (segment interiors) are never restricted.
    pub fn turn_allowed(&self, from: SegmentId, via: NodeId, to: SegmentId) -> bool {
        if via.is_fake() {
            return true;
        }
        let from = if from == SegmentId::INVALID { from } else { self.real_segment(from) };
        self.graph.turn_allowed(from, via, self.real_segment(to))
    }
}
