//! Forward and reverse geocoding against a Mapbox-style places endpoint.
//!
//! - [`protocol`]: wire types for the feature-collection response.
//! - [`endpoint`]: request URL construction.
//! - [`client`]: the async client and its error taxonomy.

pub mod client;
pub mod endpoint;
pub mod protocol;

pub use client::*;
pub use endpoint::*;
pub use protocol::*;
