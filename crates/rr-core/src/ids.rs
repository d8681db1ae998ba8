//! Strongly typed, zero-cost identifier wrappers.
//!
//! All IDs are `Copy + Ord + Hash` so they can be used as map keys and sorted
//! collection elements without ceremony.  The inner integer is `pub` to allow
//! direct indexing into SoA `Vec`s via `id.0 as usize`, but callers should
//! prefer the `.index()` helpers for clarity.
//!
//! `NodeId` and `SegmentId` reserve the top of their index space for fake
//! elements synthesised per routing call (waypoints that land in the middle
//! of a segment); `is_fake()` is a single comparison.

use std::fmt;

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Sentinel meaning "no valid ID" — equivalent to `u32::MAX`.
            pub const INVALID: $name = $name(<$inner>::MAX);

            /// Cast to `usize` for direct use as a `Vec` index.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl Default for $name {
            /// Returns the `INVALID` sentinel so uninitialized IDs are visibly invalid.
            #[inline(always)]
            fn default() -> Self {
                Self::INVALID
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl From<$name> for usize {
            #[inline(always)]
            fn from(id: $name) -> usize {
                id.0 as usize
            }
        }

        impl TryFrom<usize> for $name {
            type Error = std::num::TryFromIntError;
            fn try_from(n: usize) -> Result<$name, Self::Error> {
                <$inner>::try_from(n).map($name)
            }
        }
    };
}

typed_id! {
    /// Index of a road-graph node.  Indices at or above [`NodeId::FAKE_BASE`]
    /// denote fake nodes synthesised for one routing call.
    pub struct NodeId(u32);
}

typed_id! {
    /// Index of a road-graph segment.  Indices at or above
    /// [`SegmentId::FAKE_BASE`] denote fake half-segments.
    pub struct SegmentId(u32);
}

typed_id! {
    /// Index of a way (shared attributes of one or more segments).
    pub struct WayId(u32);
}

typed_id! {
    /// Index of a turn-restriction relation.
    pub struct RelationId(u32);
}

typed_id! {
    /// Index of a path-state record in a `ResultStore` arena.
    pub struct ResultId(u32);
}

// ── Fake index space ──────────────────────────────────────────────────────────

impl NodeId {
    /// First index reserved for fake nodes.  Real graphs never reach this.
    pub const FAKE_BASE: u32 = 0xFFFF_0000;

    /// The `i`-th fake node of the current routing call.
    #[inline]
    pub fn fake(i: usize) -> NodeId {
        NodeId(Self::FAKE_BASE + i as u32)
    }

    #[inline]
    pub fn is_fake(self) -> bool {
        self.0 >= Self::FAKE_BASE && self != Self::INVALID
    }

    /// Position of a fake node within its per-call set.
    #[inline]
    pub fn fake_index(self) -> usize {
        debug_assert!(self.is_fake());
        (self.0 - Self::FAKE_BASE) as usize
    }
}

impl SegmentId {
    /// First index reserved for fake segments.
    pub const FAKE_BASE: u32 = 0xFFFF_0000;

    /// The `i`-th fake segment of the current routing call.
    #[inline]
    pub fn fake(i: usize) -> SegmentId {
        SegmentId(Self::FAKE_BASE + i as u32)
    }

    #[inline]
    pub fn is_fake(self) -> bool {
        self.0 >= Self::FAKE_BASE && self != Self::INVALID
    }

    /// Position of a fake segment within its per-call set.
    #[inline]
    pub fn fake_index(self) -> usize {
        debug_assert!(self.is_fake());
        (self.0 - Self::FAKE_BASE) as usize
    }
}
