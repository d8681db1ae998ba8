//! `rr-graph` — the static road network the router searches.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                   |
//! |-------------|------------------------------------------------------------|
//! | [`graph`]   | `Graph` (SoA storage + CSR adjacency + R-tree), `Way`, flags, turn restrictions |
//! | [`builder`] | `GraphBuilder` — in-memory construction for embedders and tests |
//! | [`file`]    | Binary graph-file reading/writing with header validation   |
//! | [`error`]   | `GraphError`, `GraphResult<T>`                             |
//!
//! # Immutability
//!
//! A built `Graph` is never mutated: routing calls share it by reference
//! across threads, each call owning only its own search state.

pub mod builder;
pub mod error;
pub mod file;
pub mod graph;

#[cfg(test)]
mod tests;

pub use builder::GraphBuilder;
pub use error::{GraphError, GraphResult};
pub use graph::{
    Graph, NodeFlags, RestrictionKind, SegFlags, SegmentSnap, TurnRestriction, Way,
};
