//! Decorative canvas effects.
//!
//! Nothing here feeds back into application state: layers own their own
//! particles and grids, advance them once per frame and paint through the
//! [`canvas::Canvas2d`] trait, which the browser implements on top of
//! `CanvasRenderingContext2d`.

pub mod background;
pub mod canvas;
pub mod connection;
pub mod hexagons;
pub mod particles;

pub use background::*;
pub use canvas::*;
pub use connection::*;
pub use hexagons::*;
pub use particles::*;
