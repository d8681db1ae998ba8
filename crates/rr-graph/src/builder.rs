//! Incremental graph construction.
//!
//! The builder accepts nodes, ways, segments, and turn restrictions in any
//! order; [`GraphBuilder::build`] assembles the CSR adjacency, sorts and
//! indexes the restrictions, and bulk-loads the R-tree.  `NodeId`s,
//! `SegmentId`s, and `WayId`s are assigned sequentially at insertion and
//! never change, so restrictions can reference segments added earlier.
//!
//! Super-graph annotations (`mark_super_node`, `add_super_shortcut`) are
//! provided for the database-builder glue and for tests; this crate does not
//! itself contract the graph.

use rstar::RTree;
use rustc_hash::FxHashMap;
use tracing::debug;

use rr_core::{GeoPoint, NodeId, SegmentId, WayId};

use crate::graph::{Graph, NodeEntry, NodeFlags, RestrictionKind, SegFlags, TurnRestriction, Way};

/// Construct a [`Graph`] incrementally, then call [`build`](Self::build).
///
/// # Example
///
/// ```
/// use rr_core::{GeoPoint, Highway};
/// use rr_graph::{GraphBuilder, Way};
///
/// let mut b = GraphBuilder::new();
/// let w = b.add_way(Way::new(Highway::Residential));
/// let a = b.add_node(GeoPoint::new(51.50, -0.10));
/// let c = b.add_node(GeoPoint::new(51.51, -0.10));
/// b.add_segment(a, c, w);
/// let graph = b.build();
/// assert_eq!(graph.node_count(), 2);
/// assert_eq!(graph.segment_count(), 1);
/// ```
pub struct GraphBuilder {
    node_pos: Vec<GeoPoint>,
    node_flags: Vec<NodeFlags>,
    ways: Vec<Way>,
    seg_node1: Vec<NodeId>,
    seg_node2: Vec<NodeId>,
    seg_way: Vec<WayId>,
    seg_distance: Vec<f32>,
    seg_flags: Vec<SegFlags>,
    relations: Vec<TurnRestriction>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        GraphBuilder {
            node_pos: Vec::new(),
            node_flags: Vec::new(),
            ways: Vec::new(),
            seg_node1: Vec::new(),
            seg_node2: Vec::new(),
            seg_way: Vec::new(),
            seg_distance: Vec::new(),
            seg_flags: Vec::new(),
            relations: Vec::new(),
        }
    }

    /// Pre-allocate for the expected number of nodes and segments.
    pub fn with_capacity(nodes: usize, segments: usize) -> Self {
        let mut b = GraphBuilder::new();
        b.node_pos.reserve(nodes);
        b.node_flags.reserve(nodes);
        b.seg_node1.reserve(segments);
        b.seg_node2.reserve(segments);
        b.seg_way.reserve(segments);
        b.seg_distance.reserve(segments);
        b.seg_flags.reserve(segments);
        b
    }

    // ── Nodes ─────────────────────────────────────────────────────────────

    /// Add a node and return its `NodeId` (sequential from 0).
    pub fn add_node(&mut self, pos: GeoPoint) -> NodeId {
        let id = NodeId(self.node_pos.len() as u32);
        self.node_pos.push(pos);
        self.node_flags.push(NodeFlags::default());
        id
    }

    pub fn mark_super_node(&mut self, node: NodeId) {
        self.node_flags[node.index()].0 |= NodeFlags::SUPER;
    }

    pub fn mark_mini_roundabout(&mut self, node: NodeId) {
        self.node_flags[node.index()].0 |= NodeFlags::MINI_ROUNDABOUT;
    }

    pub fn node_pos(&self, node: NodeId) -> GeoPoint {
        self.node_pos[node.index()]
    }

    // ── Ways ──────────────────────────────────────────────────────────────

    pub fn add_way(&mut self, way: Way) -> WayId {
        let id = WayId(self.ways.len() as u32);
        self.ways.push(way);
        id
    }

    // ── Segments ──────────────────────────────────────────────────────────

    /// Add a normal (road) segment; the distance is the great-circle length
    /// between its endpoints.
    pub fn add_segment(&mut self, node1: NodeId, node2: NodeId, way: WayId) -> SegmentId {
        let distance = self.node_pos[node1.index()].distance_m(self.node_pos[node2.index()]);
        self.push_segment(node1, node2, way, distance, SegFlags(SegFlags::NORMAL))
    }

    /// Add a super-graph shortcut whose `distance` is the pre-computed
    /// shortest-path weight between its (super-node) endpoints.
    pub fn add_super_shortcut(
        &mut self,
        node1: NodeId,
        node2: NodeId,
        way: WayId,
        distance: f32,
    ) -> SegmentId {
        self.push_segment(node1, node2, way, distance, SegFlags(SegFlags::SUPER))
    }

    /// Restrict an existing segment to one-way travel *out of* `from_node`.
    pub fn oneway(&mut self, seg: SegmentId, from_node: NodeId) {
        if self.seg_node1[seg.index()] == from_node {
            self.seg_flags[seg.index()].0 |= SegFlags::ONEWAY_1TO2;
        } else {
            self.seg_flags[seg.index()].0 |= SegFlags::ONEWAY_2TO1;
        }
    }

    /// Flag an existing normal segment as also belonging to the super graph
    /// (the shortcut between its endpoints is the segment itself).
    pub fn mark_super_segment(&mut self, seg: SegmentId) {
        self.seg_flags[seg.index()].0 |= SegFlags::SUPER;
    }

    /// Raw node insertion with pre-set flags (file loader).
    pub(crate) fn push_node_raw(&mut self, pos: GeoPoint, flags: NodeFlags) -> NodeId {
        let id = self.add_node(pos);
        self.node_flags[id.index()] = flags;
        id
    }

    /// Raw segment insertion with explicit distance and flags (file loader).
    pub(crate) fn push_segment_raw(
        &mut self,
        node1: NodeId,
        node2: NodeId,
        way: WayId,
        distance: f32,
        flags: SegFlags,
    ) -> SegmentId {
        self.push_segment(node1, node2, way, distance, flags)
    }

    fn push_segment(
        &mut self,
        node1: NodeId,
        node2: NodeId,
        way: WayId,
        distance: f32,
        flags: SegFlags,
    ) -> SegmentId {
        let id = SegmentId(self.seg_node1.len() as u32);
        self.seg_node1.push(node1);
        self.seg_node2.push(node2);
        self.seg_way.push(way);
        self.seg_distance.push(distance);
        self.seg_flags.push(flags);
        id
    }

    // ── Turn restrictions ─────────────────────────────────────────────────

    pub fn add_turn_restriction(
        &mut self,
        from: SegmentId,
        via: NodeId,
        to: SegmentId,
        kind: RestrictionKind,
    ) {
        self.relations.push(TurnRestriction { from, via, to, kind });
    }

    // ── Assembly ──────────────────────────────────────────────────────────

    pub fn node_count(&self) -> usize {
        self.node_pos.len()
    }

    pub fn segment_count(&self) -> usize {
        self.seg_node1.len()
    }

    /// Consume the builder and produce a [`Graph`].
    ///
    /// Time complexity: O(S) for the CSR pass, O(R log R) for the relation
    /// sort, O(N log N) for the R-tree bulk load.
    pub fn build(mut self) -> Graph {
        let node_count = self.node_pos.len();
        let segment_count = self.seg_node1.len();

        // CSR over incident segments; every segment appears under both
        // endpoints.
        let mut node_seg_start = vec![0u32; node_count + 1];
        for i in 0..segment_count {
            node_seg_start[self.seg_node1[i].index() + 1] += 1;
            node_seg_start[self.seg_node2[i].index() + 1] += 1;
        }
        for i in 1..=node_count {
            node_seg_start[i] += node_seg_start[i - 1];
        }

        let mut cursor = node_seg_start.clone();
        let mut node_segments = vec![SegmentId::INVALID; segment_count * 2];
        for i in 0..segment_count {
            let seg = SegmentId(i as u32);
            for node in [self.seg_node1[i], self.seg_node2[i]] {
                node_segments[cursor[node.index()] as usize] = seg;
                cursor[node.index()] += 1;
            }
        }

        // Sort restrictions by via node and index the ranges.
        self.relations.sort_by_key(|r| r.via);
        let mut relation_index: FxHashMap<NodeId, (u32, u32)> = FxHashMap::default();
        let mut i = 0;
        while i < self.relations.len() {
            let via = self.relations[i].via;
            let start = i;
            while i < self.relations.len() && self.relations[i].via == via {
                i += 1;
            }
            relation_index.insert(via, (start as u32, i as u32));
            self.node_flags[via.index()].0 |= NodeFlags::TURN_RESTRICTED;
        }

        // Bulk-load the R-tree (faster than N inserts).
        let entries: Vec<NodeEntry> = self
            .node_pos
            .iter()
            .enumerate()
            .map(|(i, &pos)| NodeEntry { point: [pos.lat, pos.lon], id: NodeId(i as u32) })
            .collect();
        let spatial_idx = RTree::bulk_load(entries);

        debug!(
            nodes = node_count,
            segments = segment_count,
            ways = self.ways.len(),
            relations = self.relations.len(),
            "graph assembled"
        );

        Graph {
            node_pos: self.node_pos,
            node_flags: self.node_flags,
            node_seg_start,
            node_segments,
            seg_node1: self.seg_node1,
            seg_node2: self.seg_node2,
            seg_way: self.seg_way,
            seg_distance: self.seg_distance,
            seg_flags: self.seg_flags,
            ways: self.ways,
            relations: self.relations,
            relation_index,
            spatial_idx,
        }
    }
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}
