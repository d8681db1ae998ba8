//! Fake nodes and segments for waypoints that land inside a segment.
//!
//! When a waypoint's closest network point is the interior of a segment, the
//! router synthesises a node at the projection and two half-segments joining
//! it to the real endpoints.  Fake indices live at the top of the id space
//! ([`NodeId::FAKE_BASE`]), so real lookups never collide with them, and the
//! whole set is dropped at the end of the routing call.
//!
//! Fake segment numbering: fake node `i` owns fake segments `2i` (to the
//! parent's `node1`) and `2i + 1` (to the parent's `node2`).

use rr_core::{GeoPoint, NodeId, SegmentId};
use rr_graph::{Graph, SegFlags};

/// A waypoint's projection onto segment `segment`, `dist1`/`dist2` metres
/// from the parent's `node1`/`node2`.
#[derive(Clone, Debug)]
pub struct FakeNode {
    pub pos: GeoPoint,
    pub segment: SegmentId,
    pub node1: NodeId,
    pub node2: NodeId,
    pub dist1: f32,
    pub dist2: f32,
}

/// The fake nodes of one routing call.
#[derive(Default)]
pub struct FakeGraph {
    nodes: Vec<FakeNode>,
}

/// Projections closer than this to a segment endpoint snap to the real node.
const ENDPOINT_EPSILON_M: f32 = 1.0;

impl FakeGraph {
    pub fn new() -> FakeGraph {
        FakeGraph::default()
    }

    /// Snap each waypoint to the network.
    ///
    /// Returns the fake set and, per waypoint, the node the route should pass
    /// through: an existing real node when the projection lands on (or within
    /// a metre of) one, a fresh fake node otherwise, or `None` when no
    /// segment lies within `max_dist_m`.
    pub fn snap(
        graph: &Graph,
        waypoints: &[GeoPoint],
        max_dist_m: f32,
    ) -> (FakeGraph, Vec<Option<NodeId>>) {
        let mut fakes = FakeGraph::new();
        let mut nodes = Vec::with_capacity(waypoints.len());

        for &wp in waypoints {
            let Some(snap) = graph.nearest_segment(wp, max_dist_m) else {
                nodes.push(None);
                continue;
            };

            let node1 = graph.node1(snap.segment);
            let node2 = graph.node2(snap.segment);
            let length = snap.point.distance_m(graph.position(node1))
                + snap.point.distance_m(graph.position(node2));
            let dist1 = snap.point.distance_m(graph.position(node1));

            if dist1 <= ENDPOINT_EPSILON_M {
                nodes.push(Some(node1));
            } else if length - dist1 <= ENDPOINT_EPSILON_M {
                nodes.push(Some(node2));
            } else {
                let id = NodeId::fake(fakes.nodes.len());
                fakes.nodes.push(FakeNode {
                    pos: snap.point,
                    segment: snap.segment,
                    node1,
                    node2,
                    dist1,
                    dist2: length - dist1,
                });
                nodes.push(Some(id));
            }
        }

        (fakes, nodes)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[inline]
    fn node(&self, fake: NodeId) -> &FakeNode {
        &self.nodes[fake.fake_index()]
    }

    #[inline]
    fn parent_of_segment(&self, seg: SegmentId) -> &FakeNode {
        &self.nodes[seg.fake_index() / 2]
    }

    // ── Node accessors ────────────────────────────────────────────────────

    pub fn position(&self, fake: NodeId) -> GeoPoint {
        self.node(fake).pos
    }

    // ── Segment accessors ─────────────────────────────────────────────────

    /// The real segment a fake segment is half of.
    pub fn real_segment(&self, seg: SegmentId) -> SegmentId {
        self.parent_of_segment(seg).segment
    }

    /// Endpoints of a fake segment: (real endpoint, fake node).
    pub fn endpoints(&self, seg: SegmentId) -> (NodeId, NodeId) {
        let parent = self.parent_of_segment(seg);
        let fake = NodeId::fake(seg.fake_index() / 2);
        if seg.fake_index() % 2 == 0 {
            (parent.node1, fake)
        } else {
            (parent.node2, fake)
        }
    }

    pub fn distance(&self, seg: SegmentId) -> f32 {
        let parent = self.parent_of_segment(seg);
        if seg.fake_index() % 2 == 0 { parent.dist1 } else { parent.dist2 }
    }

    /// One-way state inherited from the parent: `true` if the fake half may
    /// not be used to leave `node`.
    pub fn is_oneway_towards(&self, graph: &Graph, seg: SegmentId, node: NodeId) -> bool {
        let parent = self.parent_of_segment(seg);
        let flags = graph.seg_flags(parent.segment);
        let (real_end, fake) = self.endpoints(seg);

        // Direction of permitted travel on the parent, if any.
        let towards_node2 = flags.contains(SegFlags::ONEWAY_1TO2);
        let towards_node1 = flags.contains(SegFlags::ONEWAY_2TO1);
        if !towards_node1 && !towards_node2 {
            return false;
        }

        // On the node1 half, travel "towards node2" means real end → fake;
        // on the node2 half it means fake → real end.
        let first_half = real_end == parent.node1;
        let permitted_destination = match (first_half, towards_node2) {
            (true, true) => fake,
            (true, false) => real_end,
            (false, true) => real_end,
            (false, false) => fake,
        };
        node == permitted_destination
    }

    /// Fake segments incident to `node` — the two halves of a fake node, or
    /// any halves whose real endpoint is `node`.
    pub fn segments_touching(&self, node: NodeId) -> impl Iterator<Item = SegmentId> + '_ {
        self.nodes.iter().enumerate().flat_map(move |(i, f)| {
            let own = node == NodeId::fake(i);
            let first = (own || f.node1 == node).then(|| SegmentId::fake(2 * i));
            let second = (own || f.node2 == node).then(|| SegmentId::fake(2 * i + 1));
            first.into_iter().chain(second)
        })
    }
}
