//! Runtime configuration handed over by the host page.

use geocoding::endpoint::DEFAULT_GEOCODING_BASE_URL;
use serde::Deserialize;

/// Everything the host page can override. Missing keys keep their defaults,
/// so `{}` is a valid configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct HiveConfig {
    /// Base URL of the recommendation backend.
    pub api_base_url: String,
    pub geocoding_base_url: String,
    /// Mapbox access token. The map and geocoding stay disabled while empty.
    pub mapbox_token: String,
    pub map_style: String,
    pub map_container_id: String,
    pub background_canvas_id: String,
    pub connection_canvas_id: String,
    pub honeycomb_canvas_id: String,
    /// `tracing` filter directive, e.g. `info` or `geocoding=debug,info`.
    pub log_level: String,
}

impl Default for HiveConfig {
    fn default() -> Self {
        Self {
            api_base_url: advisor::client::DEFAULT_API_BASE_URL.to_string(),
            geocoding_base_url: DEFAULT_GEOCODING_BASE_URL.to_string(),
            mapbox_token: String::new(),
            map_style: "mapbox://styles/mapbox/standard".to_string(),
            map_container_id: "hive-map".to_string(),
            background_canvas_id: "hive-background".to_string(),
            connection_canvas_id: "hive-connection".to_string(),
            honeycomb_canvas_id: "hive-honeycomb".to_string(),
            log_level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Not valid JSON, or a field has the wrong type.
    Parse(String),
    Invalid(&'static str),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Parse(msg) => write!(f, "invalid config JSON: {msg}"),
            ConfigError::Invalid(what) => write!(f, "invalid config: {what}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl HiveConfig {
    /// Parses and validates. A blank string means "all defaults".
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let cfg: HiveConfig = if json.trim().is_empty() {
            HiveConfig::default()
        } else {
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?
        };
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_base_url.trim().is_empty() {
            return Err(ConfigError::Invalid("api_base_url must not be empty"));
        }
        if self.geocoding_base_url.trim().is_empty() {
            return Err(ConfigError::Invalid("geocoding_base_url must not be empty"));
        }
        Ok(())
    }

    pub fn has_map(&self) -> bool {
        !self.mapbox_token.trim().is_empty()
    }
}
