use crate::camera::CameraOptions;

/// The operations the controller needs from a map widget.
///
/// The browser implements this over `mapboxgl.Map`. Widgets report the end
/// of a camera animation by calling
/// [`MapController::on_move_end`](crate::controller::MapController::on_move_end).
pub trait MapWidget {
    fn fly_to(&mut self, camera: &CameraOptions);
    fn jump_to(&mut self, camera: &CameraOptions);
    fn bearing(&self) -> f64;
    fn set_bearing(&mut self, bearing_deg: f64);
    fn zoom(&self) -> f64;
    fn set_zoom(&mut self, zoom: f64);
    fn set_pitch(&mut self, pitch_deg: f64);
    /// Releases the widget and its DOM resources.
    fn remove(&mut self);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapError {
    /// The widget could not be constructed (missing container, bad token...).
    Create(String),
}

impl std::fmt::Display for MapError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MapError::Create(msg) => write!(f, "map widget creation failed: {msg}"),
        }
    }
}

impl std::error::Error for MapError {}
