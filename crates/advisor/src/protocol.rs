use serde::{Deserialize, Serialize};

pub const RECOMMENDATIONS_PATH: &str = "/recommendations";
pub const CLIMATE_IMPACT_PATH: &str = "/climate-impact";

/// Body of both backend endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvisorRequest {
    pub city: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question: Option<String>,
}

impl AdvisorRequest {
    pub fn for_city(city: impl Into<String>) -> Self {
        Self {
            city: city.into(),
            question: None,
        }
    }

    pub fn with_question(city: impl Into<String>, question: impl Into<String>) -> Self {
        Self {
            city: city.into(),
            question: Some(question.into()),
        }
    }
}

/// Response of both endpoints: `{result}` on success, `{error}` otherwise.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvisorResponse {
    #[serde(default)]
    pub result: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}
