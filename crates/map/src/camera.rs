use foundation::geo::LngLat;
use serde::Serialize;

/// Zoom of the world view the globe settles on.
pub const WORLD_ZOOM: f64 = 1.3;

pub const FOCUS_ZOOM: f64 = 16.0;
pub const FOCUS_PITCH_DEG: f64 = 60.0;
pub const FOCUS_BEARING_DEG: f64 = -20.0;

pub const FLY_SPEED: f64 = 0.8;
pub const FLY_CURVE: f64 = 1.8;

/// A camera target in the shape `mapboxgl.Map#flyTo` / `#jumpTo` accept.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct CameraOptions {
    pub center: LngLat,
    pub zoom: f64,
    pub pitch: f64,
    pub bearing: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub curve: Option<f64>,
    /// Animate even when the user prefers reduced motion.
    pub essential: bool,
}

impl CameraOptions {
    /// Instant placement at zoom 0 over the origin.
    pub fn world_origin() -> Self {
        Self {
            center: LngLat::ORIGIN,
            zoom: 0.0,
            pitch: 0.0,
            bearing: 0.0,
            speed: None,
            curve: None,
            essential: false,
        }
    }

    /// Flight back to the world view.
    pub fn world_flight() -> Self {
        Self {
            center: LngLat::ORIGIN,
            zoom: WORLD_ZOOM,
            pitch: 0.0,
            bearing: 0.0,
            speed: Some(FLY_SPEED),
            curve: Some(FLY_CURVE),
            essential: true,
        }
    }

    /// Oblique close-up flight onto `target`.
    pub fn focus_flight(target: LngLat) -> Self {
        Self {
            center: target,
            zoom: FOCUS_ZOOM,
            pitch: FOCUS_PITCH_DEG,
            bearing: FOCUS_BEARING_DEG,
            speed: Some(FLY_SPEED),
            curve: Some(FLY_CURVE),
            essential: true,
        }
    }
}

/// Construction options for a new widget.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapOptions {
    pub container: String,
    pub style: String,
    pub access_token: String,
    pub center: LngLat,
    pub zoom: f64,
    pub pitch: f64,
    pub bearing: f64,
    pub projection: &'static str,
    pub attribution_control: bool,
}

impl MapOptions {
    pub fn globe(container: impl Into<String>, style: impl Into<String>, token: impl Into<String>) -> Self {
        let origin = CameraOptions::world_origin();
        Self {
            container: container.into(),
            style: style.into(),
            access_token: token.into(),
            center: origin.center,
            zoom: origin.zoom,
            pitch: origin.pitch,
            bearing: origin.bearing,
            projection: "globe",
            attribution_control: false,
        }
    }
}
