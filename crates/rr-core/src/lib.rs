//! `rr-core` — foundational types for the `rr` road-routing engine.
//!
//! This crate is a dependency of every other `rr-*` crate.  It intentionally
//! has no `rr-*` dependencies and minimal external ones (only `thiserror`,
//! plus optional `serde`).
//!
//! # What lives here
//!
//! | Module        | Contents                                               |
//! |---------------|--------------------------------------------------------|
//! | [`ids`]       | `NodeId`, `SegmentId`, `WayId`, `RelationId`, `ResultId` |
//! | [`geo`]       | `GeoPoint`, haversine distance, bearings, turn angles  |
//! | [`highway`]   | The 13 `Highway` classes                               |
//! | [`transport`] | `Transport` enum and `Transports` bitmask              |
//! | [`error`]     | `CoreError`, `CoreResult`                              |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                      |
//! |---------|-------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.         |

pub mod error;
pub mod geo;
pub mod highway;
pub mod ids;
pub mod transport;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{CoreError, CoreResult};
pub use geo::GeoPoint;
pub use highway::Highway;
pub use ids::{NodeId, RelationId, ResultId, SegmentId, WayId};
pub use transport::{Transport, Transports};
