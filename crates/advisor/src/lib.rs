//! Client side of the climate advisory backend.
//!
//! The backend exposes two JSON endpoints (`/recommendations` and
//! `/climate-impact`). This crate owns the wire types, the client, the
//! result panel state that the page renders, and markdown rendering for the
//! answers.

pub mod client;
pub mod markdown;
pub mod panel;
pub mod protocol;
pub mod subtitles;

pub use client::*;
pub use markdown::render_markdown;
pub use panel::*;
pub use protocol::*;
pub use subtitles::*;
