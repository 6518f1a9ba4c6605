use foundation::geo::LngLat;

/// Default forward/reverse endpoint of the mapping provider.
pub const DEFAULT_GEOCODING_BASE_URL: &str = "https://api.mapbox.com/geocoding/v5/mapbox.places";

/// Where and how to reach the geocoding service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeocodingEndpoint {
    base_url: String,
    access_token: String,
}

impl GeocodingEndpoint {
    pub fn new(base_url: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            access_token: access_token.into(),
        }
    }

    pub fn mapbox(access_token: impl Into<String>) -> Self {
        Self::new(DEFAULT_GEOCODING_BASE_URL, access_token)
    }

    pub fn has_token(&self) -> bool {
        !self.access_token.trim().is_empty()
    }

    /// `{base}/{city}.json?access_token=...` with the city percent-encoded.
    pub fn forward_url(&self, city: &str) -> String {
        self.url_for(&urlencoding::encode(city.trim()))
    }

    /// `{base}/{lon},{lat}.json?access_token=...`.
    pub fn reverse_url(&self, position: LngLat) -> String {
        self.url_for(&position.to_string())
    }

    fn url_for(&self, segment: &str) -> String {
        format!(
            "{}/{}.json?access_token={}",
            self.base_url.trim_end_matches('/'),
            segment,
            urlencoding::encode(&self.access_token)
        )
    }
}
