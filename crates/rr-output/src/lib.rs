//! `rr-output` — turning a routed chain into narrated output.
//!
//! # Crate layout
//!
//! | Module           | Contents                                             |
//! |------------------|------------------------------------------------------|
//! | [`annotate`]     | `Importance`, `RoutePoint`, `annotate_route`         |
//! | [`translations`] | `Translations` catalogue, `OutputContext`            |
//! | [`text`]         | Tab-separated turn-by-turn and every-node tables     |
//! | [`gpx`]          | GPX track and route writers                          |
//! | [`html`]         | Self-contained HTML instruction page                 |
//! | [`error`]        | `OutputError`, `OutputResult<T>`                     |
//!
//! The annotator is the boundary: it consumes the router's result chains and
//! produces a flat `Vec<RoutePoint>`; every writer below it is plain
//! formatting over that stream and an `io::Write` sink.  File naming is the
//! caller's business.

pub mod annotate;
pub mod error;
pub mod gpx;
pub mod html;
pub mod text;
pub mod translations;


pub use annotate::{Importance, RoutePoint, annotate_route, heading_index, turn_index};
pub use error::{OutputError, OutputResult};
pub use gpx::{write_gpx_route, write_gpx_track};
pub use html::write_html;
pub use text::{write_text, write_text_all};
pub use translations::{OutputContext, Translations};
