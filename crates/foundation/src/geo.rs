use serde::{Deserialize, Serialize};

use crate::math::wrap_lon_deg;

/// A WGS84 position in degrees, longitude first (the order geocoders and
/// web map widgets use on the wire).
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct LngLat {
    pub lon: f64,
    pub lat: f64,
}

impl LngLat {
    /// Centre of the world view.
    pub const ORIGIN: LngLat = LngLat { lon: 0.0, lat: 0.0 };

    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    pub fn is_valid(&self) -> bool {
        self.lon.is_finite()
            && self.lat.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }

    /// Same position with the longitude wrapped into `[-180, 180)`.
    pub fn wrapped(self) -> Self {
        Self::new(wrap_lon_deg(self.lon), self.lat)
    }
}

impl From<[f64; 2]> for LngLat {
    fn from(pair: [f64; 2]) -> Self {
        Self::new(pair[0], pair[1])
    }
}

impl From<LngLat> for [f64; 2] {
    fn from(p: LngLat) -> Self {
        [p.lon, p.lat]
    }
}

impl std::fmt::Display for LngLat {
    /// `"{lon},{lat}"`, the reverse geocoding query form.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{}", self.lon, self.lat)
    }
}
