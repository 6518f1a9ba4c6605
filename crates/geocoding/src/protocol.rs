//! Geocoding wire format.
//!
//! Only the fields the client reads are modelled; everything else in the
//! provider's GeoJSON response is ignored.

use foundation::geo::LngLat;
use serde::{Deserialize, Serialize};

/// Place-type classification for a city or town.
pub const PLACE_TYPE_PLACE: &str = "place";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(default)]
    pub features: Vec<Feature>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    #[serde(default)]
    pub center: Option<LngLat>,
    #[serde(default)]
    pub place_type: Vec<String>,
    /// Short name ("Paris").
    #[serde(default)]
    pub text: Option<String>,
    /// Fully qualified name ("Paris, Île-de-France, France").
    #[serde(default)]
    pub place_name: Option<String>,
}

impl Feature {
    pub fn is_place(&self) -> bool {
        self.place_type.iter().any(|t| t == PLACE_TYPE_PLACE)
    }
}

/// A named city or town returned by reverse geocoding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub name: String,
    pub full_name: Option<String>,
    pub center: Option<LngLat>,
}

impl FeatureCollection {
    pub fn from_json_str(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }

    /// Centre of the first feature, if the first feature has one.
    pub fn first_center(&self) -> Option<LngLat> {
        self.features.first().and_then(|f| f.center)
    }

    /// First feature classified as a place that carries a name.
    pub fn first_place(&self) -> Option<Place> {
        let feature = self.features.iter().find(|f| f.is_place())?;
        let name = feature.text.as_deref()?.trim();
        if name.is_empty() {
            return None;
        }
        Some(Place {
            name: name.to_string(),
            full_name: feature.place_name.clone(),
            center: feature.center,
        })
    }
}
