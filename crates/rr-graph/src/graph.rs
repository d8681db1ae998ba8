//! Road graph representation.
//!
//! # Data layout
//!
//! Node and segment attributes are stored as parallel arrays (SoA) indexed by
//! `NodeId` / `SegmentId`.  Segments are *undirected* records with a
//! this-node/other-node convention: each segment joins `node1` and `node2`,
//! appears in both endpoints' adjacency lists, and carries one-way and
//! super/normal flags.  Adjacency uses Compressed Sparse Row: the segments
//! incident to node `n` occupy
//!
//! ```text
//! node_segments[ node_seg_start[n] .. node_seg_start[n+1] ]
//! ```
//!
//! # Super graph
//!
//! Nodes flagged `SUPER` and segments flagged `SUPER` form a contracted
//! overlay: a super segment's `distance` is the pre-computed shortest-path
//! weight between its super-node endpoints.  A segment may be both `NORMAL`
//! and `SUPER` when the shortcut is the road segment itself.
//!
//! # Spatial index
//!
//! An R-tree (via `rstar`) maps `(lat, lon)` to the nearest node; waypoint
//! snapping walks the incident segments of the nearest few nodes to find the
//! closest projection onto an actual segment.

use rstar::{AABB, PointDistance, RTree, RTreeObject};
use rustc_hash::FxHashMap;

use rr_core::{GeoPoint, Highway, NodeId, SegmentId, Transports, WayId};

// ── Flags ─────────────────────────────────────────────────────────────────────

/// Per-node flag bits.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeFlags(pub u8);

impl NodeFlags {
    /// Node is part of the contracted overlay graph.
    pub const SUPER: u8 = 1 << 0;
    /// Node is a mini-roundabout.
    pub const MINI_ROUNDABOUT: u8 = 1 << 1;
    /// At least one turn restriction passes through this node.
    pub const TURN_RESTRICTED: u8 = 1 << 2;

    #[inline]
    pub fn contains(self, bit: u8) -> bool {
        self.0 & bit != 0
    }
}

/// Per-segment flag bits.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SegFlags(pub u8);

impl SegFlags {
    /// Travel permitted only from `node1` towards `node2`.
    pub const ONEWAY_1TO2: u8 = 1 << 0;
    /// Travel permitted only from `node2` towards `node1`.
    pub const ONEWAY_2TO1: u8 = 1 << 1;
    /// Segment exists in the normal (road) graph.
    pub const NORMAL: u8 = 1 << 2;
    /// Segment exists in the contracted overlay graph.
    pub const SUPER: u8 = 1 << 3;
    /// Segment is the edge of an area feature.
    pub const AREA: u8 = 1 << 4;

    #[inline]
    pub fn contains(self, bit: u8) -> bool {
        self.0 & bit != 0
    }
}

// ── Ways and relations ────────────────────────────────────────────────────────

/// Shared attributes of one or more segments.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Way {
    /// Road name; empty when unnamed (formatters substitute the class name).
    pub name: String,
    pub highway: Highway,
    /// Transports permitted on this way.
    pub transports: Transports,
    /// Way is part of a roundabout.
    pub roundabout: bool,
    /// Posted speed limit in km/h; 0 = none.
    pub speed_limit: f32,
    /// Physical limits; 0 = unrestricted.
    pub weight: f32,
    pub height: f32,
    pub width: f32,
    pub length: f32,
}

impl Way {
    /// An unnamed way of the given class open to everything.
    pub fn new(highway: Highway) -> Way {
        Way {
            name: String::new(),
            highway,
            transports: Transports::ALL,
            roundabout: false,
            speed_limit: 0.0,
            weight: 0.0,
            height: 0.0,
            width: 0.0,
            length: 0.0,
        }
    }

    pub fn named(highway: Highway, name: &str) -> Way {
        Way { name: name.to_owned(), ..Way::new(highway) }
    }
}

/// Kind of a turn restriction.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum RestrictionKind {
    /// The named continuation is the only one permitted.
    Only,
    /// The named continuation is forbidden.
    No,
}

/// A turn restriction: entering `via` by `from`, the continuation `to` is
/// either mandatory (`Only`) or forbidden (`No`).
#[derive(Copy, Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TurnRestriction {
    pub from: SegmentId,
    pub via: NodeId,
    pub to: SegmentId,
    pub kind: RestrictionKind,
}

// ── R-tree node entry ─────────────────────────────────────────────────────────

/// Entry stored in the R-tree spatial index: a 2-D `[lat, lon]` point with
/// the associated `NodeId`.
#[derive(Clone)]
pub(crate) struct NodeEntry {
    pub(crate) point: [f32; 2], // [lat, lon]
    pub(crate) id: NodeId,
}

impl RTreeObject for NodeEntry {
    type Envelope = AABB<[f32; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for NodeEntry {
    /// Squared Euclidean distance in lat/lon space.  Sufficient for
    /// nearest-node candidate generation at road-network densities.
    fn distance_2(&self, point: &[f32; 2]) -> f32 {
        let dlat = self.point[0] - point[0];
        let dlon = self.point[1] - point[1];
        dlat * dlat + dlon * dlon
    }
}

// ── Snap result ───────────────────────────────────────────────────────────────

/// Result of snapping a waypoint onto the network.
#[derive(Copy, Clone, Debug)]
pub struct SegmentSnap {
    /// The closest segment.
    pub segment: SegmentId,
    /// The projection of the waypoint onto that segment.
    pub point: GeoPoint,
    /// Parameter along `node1`→`node2` in [0, 1].
    pub t: f32,
    /// Great-circle distance from the waypoint to the projection, metres.
    pub dist_m: f32,
}

// ── Graph ─────────────────────────────────────────────────────────────────────

/// The read-only road network.  Construct with [`crate::GraphBuilder`] or
/// load from disk with [`crate::file::load`].
pub struct Graph {
    // ── Node data ─────────────────────────────────────────────────────────
    pub(crate) node_pos: Vec<GeoPoint>,
    pub(crate) node_flags: Vec<NodeFlags>,

    // ── CSR adjacency (each segment listed under both endpoints) ──────────
    pub(crate) node_seg_start: Vec<u32>,
    pub(crate) node_segments: Vec<SegmentId>,

    // ── Segment data ──────────────────────────────────────────────────────
    pub(crate) seg_node1: Vec<NodeId>,
    pub(crate) seg_node2: Vec<NodeId>,
    pub(crate) seg_way: Vec<WayId>,
    pub(crate) seg_distance: Vec<f32>,
    pub(crate) seg_flags: Vec<SegFlags>,

    // ── Ways and turn restrictions ────────────────────────────────────────
    pub(crate) ways: Vec<Way>,
    /// Sorted by `via` node.
    pub(crate) relations: Vec<TurnRestriction>,
    /// `via` node → index range into `relations`.
    pub(crate) relation_index: FxHashMap<NodeId, (u32, u32)>,

    // ── Spatial index ─────────────────────────────────────────────────────
    pub(crate) spatial_idx: RTree<NodeEntry>,
}

impl Graph {
    // ── Dimensions ────────────────────────────────────────────────────────

    pub fn node_count(&self) -> usize {
        self.node_pos.len()
    }

    pub fn segment_count(&self) -> usize {
        self.seg_node1.len()
    }

    pub fn way_count(&self) -> usize {
        self.ways.len()
    }

    pub fn relation_count(&self) -> usize {
        self.relations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_pos.is_empty()
    }

    // ── Node accessors ────────────────────────────────────────────────────

    #[inline]
    pub fn position(&self, node: NodeId) -> GeoPoint {
        self.node_pos[node.index()]
    }

    #[inline]
    pub fn node_flags(&self, node: NodeId) -> NodeFlags {
        self.node_flags[node.index()]
    }

    #[inline]
    pub fn is_super_node(&self, node: NodeId) -> bool {
        self.node_flags[node.index()].contains(NodeFlags::SUPER)
    }

    #[inline]
    pub fn is_mini_roundabout(&self, node: NodeId) -> bool {
        self.node_flags[node.index()].contains(NodeFlags::MINI_ROUNDABOUT)
    }

    /// Iterator over the segments incident to `node` — a contiguous index
    /// range, no heap allocation.
    #[inline]
    pub fn segments_at(&self, node: NodeId) -> impl Iterator<Item = SegmentId> + '_ {
        let start = self.node_seg_start[node.index()] as usize;
        let end = self.node_seg_start[node.index() + 1] as usize;
        self.node_segments[start..end].iter().copied()
    }

    /// Number of segments incident to `node`.
    #[inline]
    pub fn degree(&self, node: NodeId) -> usize {
        let start = self.node_seg_start[node.index()] as usize;
        let end = self.node_seg_start[node.index() + 1] as usize;
        end - start
    }

    // ── Segment accessors ─────────────────────────────────────────────────

    #[inline]
    pub fn node1(&self, seg: SegmentId) -> NodeId {
        self.seg_node1[seg.index()]
    }

    #[inline]
    pub fn node2(&self, seg: SegmentId) -> NodeId {
        self.seg_node2[seg.index()]
    }

    /// The endpoint of `seg` that is not `node`.
    #[inline]
    pub fn other_node(&self, seg: SegmentId, node: NodeId) -> NodeId {
        if self.seg_node1[seg.index()] == node {
            self.seg_node2[seg.index()]
        } else {
            self.seg_node1[seg.index()]
        }
    }

    #[inline]
    pub fn distance(&self, seg: SegmentId) -> f32 {
        self.seg_distance[seg.index()]
    }

    #[inline]
    pub fn seg_flags(&self, seg: SegmentId) -> SegFlags {
        self.seg_flags[seg.index()]
    }

    #[inline]
    pub fn is_normal_segment(&self, seg: SegmentId) -> bool {
        self.seg_flags[seg.index()].contains(SegFlags::NORMAL)
    }

    #[inline]
    pub fn is_super_segment(&self, seg: SegmentId) -> bool {
        self.seg_flags[seg.index()].contains(SegFlags::SUPER)
    }

    /// `true` if `seg` is one-way and `node` is its permitted destination —
    /// i.e. the segment may not be used to *leave* `node`.
    #[inline]
    pub fn is_oneway_towards(&self, seg: SegmentId, node: NodeId) -> bool {
        let flags = self.seg_flags[seg.index()];
        (flags.contains(SegFlags::ONEWAY_1TO2) && self.seg_node2[seg.index()] == node)
            || (flags.contains(SegFlags::ONEWAY_2TO1) && self.seg_node1[seg.index()] == node)
    }

    #[inline]
    pub fn way_id(&self, seg: SegmentId) -> WayId {
        self.seg_way[seg.index()]
    }

    #[inline]
    pub fn way(&self, seg: SegmentId) -> &Way {
        &self.ways[self.seg_way[seg.index()].index()]
    }

    #[inline]
    pub fn way_by_id(&self, way: WayId) -> &Way {
        &self.ways[way.index()]
    }

    // ── Turn restrictions ─────────────────────────────────────────────────

    /// All restrictions whose via node is `node`.
    pub fn restrictions_at(&self, node: NodeId) -> &[TurnRestriction] {
        match self.relation_index.get(&node) {
            Some(&(start, end)) => &self.relations[start as usize..end as usize],
            None => &[],
        }
    }

    /// Is the continuation `from` → `via` → `to` permitted by the turn
    /// restrictions?  Fake segments resolve to their real parent before the
    /// call; `from == INVALID` (a route starting at `via`) is unrestricted.
    pub fn turn_allowed(&self, from: SegmentId, via: NodeId, to: SegmentId) -> bool {
        if from == SegmentId::INVALID
            || !self.node_flags[via.index()].contains(NodeFlags::TURN_RESTRICTED)
        {
            return true;
        }

        let mut has_only = false;
        for r in self.restrictions_at(via) {
            if r.from != from {
                continue;
            }
            match r.kind {
                RestrictionKind::Only => {
                    if r.to == to {
                        return true;
                    }
                    has_only = true;
                }
                RestrictionKind::No => {
                    if r.to == to {
                        return false;
                    }
                }
            }
        }

        // An "only" restriction for this entry segment excludes every
        // continuation it does not name.
        !has_only
    }

    // ── Spatial queries ───────────────────────────────────────────────────

    /// The node nearest to `pos`, or `None` for an empty graph.
    pub fn nearest_node(&self, pos: GeoPoint) -> Option<NodeId> {
        self.spatial_idx
            .nearest_neighbor(&[pos.lat, pos.lon])
            .map(|e| e.id)
    }

    /// The closest normal segment to `pos` within `max_dist_m` metres, with
    /// the projected point.  Candidate segments are gathered from the
    /// incident lists of the nearest few indexed nodes.
    pub fn nearest_segment(&self, pos: GeoPoint, max_dist_m: f32) -> Option<SegmentSnap> {
        let mut best: Option<SegmentSnap> = None;

        for entry in self
            .spatial_idx
            .nearest_neighbor_iter(&[pos.lat, pos.lon])
            .take(8)
        {
            for seg in self.segments_at(entry.id) {
                if !self.is_normal_segment(seg) {
                    continue;
                }

                let a = self.position(self.node1(seg));
                let b = self.position(self.node2(seg));
                let (t, point) = pos.project_onto(a, b);
                let dist_m = pos.distance_m(point);

                if dist_m <= max_dist_m && best.map_or(true, |s| dist_m < s.dist_m) {
                    best = Some(SegmentSnap { segment: seg, point, t, dist_m });
                }
            }
        }

        best
    }
}
