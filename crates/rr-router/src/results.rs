//! The path-state arena and its (node, segment) index.
//!
//! # Why states are keyed by (node, incoming segment)
//!
//! A search keyed on node alone is incorrect under turn restrictions: two
//! paths arriving at the same junction by different segments have different
//! permitted continuations, so both states must be kept open.  [`Results`]
//! therefore stores at most one [`PathState`] per (node, segment) pair.
//!
//! # Storage
//!
//! States live in fixed-size chunks; only the outer chunk directory grows, so
//! a [`ResultId`] (and any reference derived from it) stays valid for the
//! lifetime of the container.  The index is a bin table keyed on the low bits
//! of the node index; each bin is a short list searched linearly.  When a bin
//! exceeds [`MAX_COLLISIONS`] entries the bin count doubles and every entry
//! is re-binned under the widened mask.

use rr_core::{NodeId, ResultId, SegmentId};

/// A state's `queued` value when it is not in the priority queue.  Heap slots
/// are 1-based, so 0 is free to act as the sentinel.
pub const NOT_QUEUED: u32 = 0;

/// Collisions tolerated in one bin before the table grows.
const MAX_COLLISIONS: usize = 32;

/// One search state: the best known way to arrive at `node` via `segment`.
#[derive(Clone, Debug)]
pub struct PathState {
    /// The node this state applies to.
    pub node: NodeId,
    /// The segment used to arrive at `node` (INVALID for an origin state).
    pub segment: SegmentId,

    /// The state this one was reached from, following the best path from the
    /// origin.  INVALID at the origin.
    pub prev: ResultId,
    /// Filled in by the forward fix after a search completes.
    pub next: ResultId,

    /// Exact accumulated cost from the origin under the active metric.
    pub score: f32,
    /// `score` plus an admissible lower bound to the goal — the queue key.
    pub sortby: f32,

    /// Current 1-based position in the priority queue, or [`NOT_QUEUED`].
    pub queued: u32,
}

/// Arena + index of [`PathState`]s for one search, plus the route metadata
/// that ties a finished chain to its endpoints.
pub struct Results {
    /// Bin table; `bins[node & mask]` lists the states for matching nodes.
    bins: Vec<Vec<ResultId>>,
    mask: u32,

    /// Fixed-size chunks; only this outer directory reallocates.
    chunks: Vec<Vec<PathState>>,
    chunk_size: usize,
    number: u32,

    /// The node the search started from.
    pub start_node: NodeId,
    /// The segment used to arrive at `start_node` (links waypoint legs).
    pub prev_segment: SegmentId,
    /// The node the search finished at (INVALID until a route is found).
    pub finish_node: NodeId,
    /// The segment used to arrive at `finish_node`.
    pub last_segment: SegmentId,
}

impl Results {
    /// Create a container with `nbins` initial bins (rounded up to a power
    /// of two; also used as the arena chunk size).
    pub fn new(nbins: usize) -> Results {
        let nbins = nbins.next_power_of_two().max(8);
        Results {
            bins: (0..nbins).map(|_| Vec::new()).collect(),
            mask: nbins as u32 - 1,
            chunks: Vec::new(),
            chunk_size: nbins,
            number: 0,
            start_node: NodeId::INVALID,
            prev_segment: SegmentId::INVALID,
            finish_node: NodeId::INVALID,
            last_segment: SegmentId::INVALID,
        }
    }

    pub fn len(&self) -> usize {
        self.number as usize
    }

    pub fn is_empty(&self) -> bool {
        self.number == 0
    }

    // ── Insertion ─────────────────────────────────────────────────────────

    /// Insert a freshly initialised state for (`node`, `segment`) and return
    /// its id.  The caller must know the pair is not already present; use
    /// [`get_or_insert`](Self::get_or_insert) otherwise.
    pub fn insert(&mut self, node: NodeId, segment: SegmentId) -> ResultId {
        debug_assert!(self.find(node, segment).is_none());

        let id = ResultId(self.number);
        if self.number as usize % self.chunk_size == 0 {
            self.chunks.push(Vec::with_capacity(self.chunk_size));
        }
        let chunk = self.chunks.len() - 1;
        self.chunks[chunk].push(PathState {
            node,
            segment,
            prev: ResultId::INVALID,
            next: ResultId::INVALID,
            score: 0.0,
            sortby: 0.0,
            queued: NOT_QUEUED,
        });
        self.number += 1;

        let bin = (node.0 & self.mask) as usize;
        self.bins[bin].push(id);
        if self.bins[bin].len() > MAX_COLLISIONS {
            self.grow();
        }

        id
    }

    /// The existing state for (`node`, `segment`), or a fresh one.
    pub fn get_or_insert(&mut self, node: NodeId, segment: SegmentId) -> ResultId {
        match self.find(node, segment) {
            Some(id) => id,
            None => self.insert(node, segment),
        }
    }

    /// Double the bin count and re-bin every entry under the widened mask.
    fn grow(&mut self) {
        let new_nbins = self.bins.len() * 2;
        self.mask = new_nbins as u32 - 1;

        let old = std::mem::replace(&mut self.bins, (0..new_nbins).map(|_| Vec::new()).collect());
        for bin in old {
            for id in bin {
                let node = self[id].node;
                self.bins[(node.0 & self.mask) as usize].push(id);
            }
        }
    }

    // ── Lookup ────────────────────────────────────────────────────────────

    /// The state for the exact (`node`, `segment`) pair.
    pub fn find(&self, node: NodeId, segment: SegmentId) -> Option<ResultId> {
        self.bins[(node.0 & self.mask) as usize]
            .iter()
            .copied()
            .find(|&id| self[id].node == node && self[id].segment == segment)
    }

    /// All states for `node`, across incoming segments.
    pub fn find_all(&self, node: NodeId) -> impl Iterator<Item = ResultId> + '_ {
        self.bins[(node.0 & self.mask) as usize]
            .iter()
            .copied()
            .filter(move |&id| self[id].node == node)
    }

    /// The state for `node` with the lowest score across incoming segments.
    pub fn find_best(&self, node: NodeId) -> Option<ResultId> {
        self.find_all(node)
            .min_by(|&a, &b| self[a].score.total_cmp(&self[b].score))
    }

    /// All states in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = ResultId> + '_ {
        (0..self.number).map(ResultId)
    }
}

impl std::ops::Index<ResultId> for Results {
    type Output = PathState;

    #[inline]
    fn index(&self, id: ResultId) -> &PathState {
        &self.chunks[id.index() / self.chunk_size][id.index() % self.chunk_size]
    }
}

impl std::ops::IndexMut<ResultId> for Results {
    #[inline]
    fn index_mut(&mut self, id: ResultId) -> &mut PathState {
        &mut self.chunks[id.index() / self.chunk_size][id.index() % self.chunk_size]
    }
}
