use foundation::geo::LngLat;
use foundation::http::{HttpTransport, TransportError};
use tracing::{debug, warn};

use crate::endpoint::GeocodingEndpoint;
use crate::protocol::{FeatureCollection, Place};

/// Why a lookup did not produce a result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeocodeError {
    /// The service answered but nothing matched.
    NotFound,
    /// The service could not be asked or its answer could not be read.
    LookupFailed(LookupFailure),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupFailure {
    Transport(TransportError),
    Status(u16),
    Decode(String),
}

impl std::fmt::Display for LookupFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LookupFailure::Transport(e) => write!(f, "{e}"),
            LookupFailure::Status(status) => write!(f, "HTTP {status}"),
            LookupFailure::Decode(msg) => write!(f, "malformed geocoding response: {msg}"),
        }
    }
}

impl std::fmt::Display for GeocodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GeocodeError::NotFound => write!(f, "no matching place"),
            GeocodeError::LookupFailed(failure) => write!(f, "geocoding lookup failed: {failure}"),
        }
    }
}

impl std::error::Error for GeocodeError {}

impl From<TransportError> for GeocodeError {
    fn from(e: TransportError) -> Self {
        GeocodeError::LookupFailed(LookupFailure::Transport(e))
    }
}

/// Forward/reverse geocoding client. Lookups are never retried.
#[derive(Debug, Clone)]
pub struct GeocodingClient<T> {
    endpoint: GeocodingEndpoint,
    transport: T,
}

impl<T: HttpTransport> GeocodingClient<T> {
    pub fn new(endpoint: GeocodingEndpoint, transport: T) -> Self {
        Self {
            endpoint,
            transport,
        }
    }

    pub fn endpoint(&self) -> &GeocodingEndpoint {
        &self.endpoint
    }

    /// Coordinates of the first feature matching `city`.
    pub async fn forward(&self, city: &str) -> Result<LngLat, GeocodeError> {
        let city = city.trim();
        if city.is_empty() {
            return Err(GeocodeError::NotFound);
        }
        let url = self.endpoint.forward_url(city);
        let features = self.fetch(&url).await?;
        match features.first_center() {
            Some(center) => {
                debug!(city, lon = center.lon, lat = center.lat, "geocoded city");
                Ok(center)
            }
            None => {
                debug!(city, "city not found");
                Err(GeocodeError::NotFound)
            }
        }
    }

    /// First city/town at `position`.
    pub async fn reverse(&self, position: LngLat) -> Result<Place, GeocodeError> {
        let url = self.endpoint.reverse_url(position);
        let features = self.fetch(&url).await?;
        features.first_place().ok_or_else(|| {
            debug!(%position, "no place at position");
            GeocodeError::NotFound
        })
    }

    async fn fetch(&self, url: &str) -> Result<FeatureCollection, GeocodeError> {
        let resp = self.transport.get(url).await.map_err(|e| {
            warn!("geocoding request failed: {e}");
            GeocodeError::from(e)
        })?;
        if !resp.ok() {
            warn!(status = resp.status, "geocoding service returned an error status");
            return Err(GeocodeError::LookupFailed(LookupFailure::Status(resp.status)));
        }
        FeatureCollection::from_json_str(&resp.body).map_err(|e| {
            warn!("geocoding response could not be decoded: {e}");
            GeocodeError::LookupFailed(LookupFailure::Decode(e.to_string()))
        })
    }
}
