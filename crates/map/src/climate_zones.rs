//! The embedded Probable Futures climate-zones map.
//!
//! The iframe opens on a northern-hemisphere globe and can be re-centred on
//! the selected city once its coordinates are known.

use foundation::geo::LngLat;
use serde::Serialize;

pub const PROBABLE_FUTURES_MAPS_URL: &str = "https://probablefutures.org/maps/";

/// 3 degC warming scenario, climate zones layer, globe view.
const ZONE_QUERY: &str = "selected_map=climate_zones&version=latest&scenario=3&view=globe";

const OVERVIEW_FRAGMENT: &str = "2/45/0";
const CITY_ZOOM: u8 = 6;

/// Iframe URL, centred on `city` when given.
pub fn climate_zones_url(city: Option<LngLat>) -> String {
    let fragment = match city {
        Some(p) => format!("{CITY_ZOOM}/{}/{}", p.lat, p.lon),
        None => OVERVIEW_FRAGMENT.to_string(),
    };
    format!("{PROBABLE_FUTURES_MAPS_URL}?{ZONE_QUERY}#{fragment}")
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub enum ZoneMapError {
    CityNotFound,
    LookupFailed,
}

impl ZoneMapError {
    pub fn message(self) -> &'static str {
        match self {
            ZoneMapError::CityNotFound => "City not found",
            ZoneMapError::LookupFailed => "Error getting coordinates",
        }
    }
}

impl std::fmt::Display for ZoneMapError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

impl std::error::Error for ZoneMapError {}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ZoneMap {
    /// No city selected yet.
    #[default]
    Empty,
    Loading {
        city: String,
    },
    Ready {
        city: String,
        center: LngLat,
        /// Whether the iframe is re-centred on the city.
        show_city: bool,
    },
    Failed {
        city: String,
        message: &'static str,
    },
}

impl ZoneMap {
    /// Starts resolving coordinates for `city`. Any previous view is dropped.
    pub fn load(&mut self, city: impl Into<String>) {
        *self = ZoneMap::Loading { city: city.into() };
    }

    /// Applies a coordinate lookup for `city`. Results for a city other than
    /// the one loading are ignored; returns whether it was applied.
    pub fn resolve(&mut self, city: &str, result: Result<LngLat, ZoneMapError>) -> bool {
        let ZoneMap::Loading { city: loading } = self else {
            return false;
        };
        if loading.as_str() != city {
            return false;
        }
        let city = std::mem::take(loading);
        *self = match result {
            Ok(center) => ZoneMap::Ready {
                city,
                center,
                show_city: false,
            },
            Err(err) => {
                tracing::warn!(%city, error = %err, "climate zones lookup failed");
                ZoneMap::Failed {
                    city,
                    message: err.message(),
                }
            }
        };
        true
    }

    /// Re-centres the iframe on the city. Only meaningful once ready.
    pub fn show_city(&mut self) {
        if let ZoneMap::Ready { show_city, .. } = self {
            *show_city = true;
        }
    }

    pub fn iframe_url(&self) -> Option<String> {
        match self {
            ZoneMap::Ready {
                center, show_city, ..
            } => Some(climate_zones_url(show_city.then_some(*center))),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, ZoneMap::Loading { .. })
    }

    pub fn error(&self) -> Option<&'static str> {
        match self {
            ZoneMap::Failed { message, .. } => Some(*message),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn overview_and_city_urls() {
        assert_eq!(
            climate_zones_url(None),
            "https://probablefutures.org/maps/?selected_map=climate_zones&version=latest&scenario=3&view=globe#2/45/0"
        );
        assert_eq!(
            climate_zones_url(Some(LngLat::new(2.35, 48.85))),
            "https://probablefutures.org/maps/?selected_map=climate_zones&version=latest&scenario=3&view=globe#6/48.85/2.35"
        );
    }

    #[test]
    fn ready_view_starts_on_overview_until_city_is_shown() {
        let mut view = ZoneMap::default();
        assert_eq!(view.iframe_url(), None);
        view.load("Lyon");
        assert!(view.is_loading());
        assert!(view.resolve("Lyon", Ok(LngLat::new(4.83, 45.76))));
        assert!(view.iframe_url().unwrap().ends_with("#2/45/0"));
        view.show_city();
        assert!(view.iframe_url().unwrap().ends_with("#6/45.76/4.83"));
    }

    #[test]
    fn failures_map_to_messages() {
        let mut view = ZoneMap::default();
        view.load("Atlantis");
        view.resolve("Atlantis", Err(ZoneMapError::CityNotFound));
        assert_eq!(view.error(), Some("City not found"));

        view.load("Paris");
        view.resolve("Paris", Err(ZoneMapError::LookupFailed));
        assert_eq!(view.error(), Some("Error getting coordinates"));
        assert_eq!(view.iframe_url(), None);
    }

    #[test]
    fn lookup_for_a_previous_city_is_ignored() {
        let mut view = ZoneMap::default();
        view.load("Paris");
        view.load("Berlin");
        assert!(!view.resolve("Paris", Ok(LngLat::new(2.35, 48.85))));
        assert!(view.is_loading());
    }

    #[test]
    fn serializes_with_state_tag() {
        let mut view = ZoneMap::default();
        view.load("Oslo");
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["state"], "loading");
        assert_eq!(json["city"], "Oslo");
    }
}
