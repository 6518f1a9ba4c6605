//! Camera sequencing for the single globe widget, plus the embedded
//! climate-zones view.

pub mod camera;
pub mod climate_zones;
pub mod controller;
pub mod widget;

pub use camera::*;
pub use climate_zones::*;
pub use controller::*;
pub use widget::*;
