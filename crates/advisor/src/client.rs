use foundation::http::{HttpTransport, TransportError};
use tracing::{debug, warn};

use crate::protocol::{AdvisorRequest, AdvisorResponse, CLIMATE_IMPACT_PATH, RECOMMENDATIONS_PATH};

/// Default backend location during development.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdvisorError {
    Transport(TransportError),
    /// The body was not the expected JSON object.
    Decode(String),
}

impl std::fmt::Display for AdvisorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AdvisorError::Transport(e) => write!(f, "advisor request failed: {e}"),
            AdvisorError::Decode(msg) => write!(f, "malformed advisor response: {msg}"),
        }
    }
}

impl std::error::Error for AdvisorError {}

impl From<TransportError> for AdvisorError {
    fn from(e: TransportError) -> Self {
        AdvisorError::Transport(e)
    }
}

#[derive(Debug, Clone)]
pub struct AdvisorClient<T> {
    base_url: String,
    transport: T,
}

impl<T: HttpTransport> AdvisorClient<T> {
    pub fn new(base_url: impl Into<String>, transport: T) -> Self {
        Self {
            base_url: base_url.into(),
            transport,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Initial adaptation recommendations for `city`.
    pub async fn recommendations(&self, city: &str) -> Result<AdvisorResponse, AdvisorError> {
        self.post(RECOMMENDATIONS_PATH, &AdvisorRequest::for_city(city))
            .await
    }

    /// Free-text follow-up question about `city`.
    pub async fn follow_up(
        &self,
        city: &str,
        question: &str,
    ) -> Result<AdvisorResponse, AdvisorError> {
        self.post(
            RECOMMENDATIONS_PATH,
            &AdvisorRequest::with_question(city, question),
        )
        .await
    }

    /// Climate-impact analysis for `city`.
    pub async fn climate_impact(&self, city: &str) -> Result<AdvisorResponse, AdvisorError> {
        self.post(CLIMATE_IMPACT_PATH, &AdvisorRequest::for_city(city))
            .await
    }

    // The backend reports failures as `{error}` with a non-2xx status, so the
    // body is decoded regardless of status.
    async fn post(
        &self,
        path: &str,
        request: &AdvisorRequest,
    ) -> Result<AdvisorResponse, AdvisorError> {
        let url = format!("{}{}", self.base_url.trim_end_matches('/'), path);
        let body =
            serde_json::to_string(request).map_err(|e| AdvisorError::Decode(e.to_string()))?;
        debug!(%url, city = %request.city, "posting advisor request");

        let resp = self.transport.post_json(&url, body).await.map_err(|e| {
            warn!("advisor request to {url} failed: {e}");
            AdvisorError::from(e)
        })?;
        serde_json::from_str::<AdvisorResponse>(&resp.body).map_err(|e| {
            warn!(status = resp.status, "advisor response from {url} is not JSON: {e}");
            AdvisorError::Decode(e.to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use foundation::http::HttpResponse;
    use futures::executor::block_on;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;

    #[derive(Default)]
    struct RecordingTransport {
        reply: RefCell<Option<Result<HttpResponse, TransportError>>>,
        posts: RefCell<Vec<(String, String)>>,
    }

    impl RecordingTransport {
        fn replying(reply: Result<HttpResponse, TransportError>) -> Self {
            Self {
                reply: RefCell::new(Some(reply)),
                posts: RefCell::new(Vec::new()),
            }
        }
    }

    impl HttpTransport for RecordingTransport {
        async fn get(&self, _url: &str) -> Result<HttpResponse, TransportError> {
            Err(TransportError::Network("unexpected GET".into()))
        }

        async fn post_json(&self, url: &str, body: String) -> Result<HttpResponse, TransportError> {
            self.posts.borrow_mut().push((url.to_string(), body));
            self.reply
                .borrow_mut()
                .take()
                .unwrap_or_else(|| Err(TransportError::Network("no reply".into())))
        }
    }

    #[test]
    fn recommendations_posts_city() {
        let t = RecordingTransport::replying(Ok(HttpResponse::new(200, r##"{"result":"# Plan"}"##)));
        let client = AdvisorClient::new("http://api.test/", &t);
        let resp = block_on(client.recommendations("Paris")).unwrap();
        assert_eq!(resp.result.as_deref(), Some("# Plan"));
        assert_eq!(
            t.posts.borrow().clone(),
            vec![(
                "http://api.test/recommendations".to_string(),
                r#"{"city":"Paris"}"#.to_string()
            )]
        );
    }

    #[test]
    fn follow_up_posts_question_to_recommendations() {
        let t = RecordingTransport::replying(Ok(HttpResponse::new(200, r#"{"result":"ok"}"#)));
        let client = AdvisorClient::new("http://api.test", &t);
        block_on(client.follow_up("Paris", "Floods?")).unwrap();
        let posts = t.posts.borrow();
        assert_eq!(posts[0].0, "http://api.test/recommendations");
        assert_eq!(posts[0].1, r#"{"city":"Paris","question":"Floods?"}"#);
    }

    #[test]
    fn climate_impact_uses_its_own_endpoint() {
        let t = RecordingTransport::replying(Ok(HttpResponse::new(200, r#"{"result":"hot"}"#)));
        let client = AdvisorClient::new("http://api.test", &t);
        block_on(client.climate_impact("Paris")).unwrap();
        assert_eq!(t.posts.borrow()[0].0, "http://api.test/climate-impact");
    }

    #[test]
    fn error_body_is_decoded_even_on_error_status() {
        let t = RecordingTransport::replying(Ok(HttpResponse::new(
            404,
            r#"{"error":"city not found"}"#,
        )));
        let client = AdvisorClient::new("http://api.test", &t);
        let resp = block_on(client.recommendations("Nowhere")).unwrap();
        assert_eq!(resp.error.as_deref(), Some("city not found"));
    }

    #[test]
    fn non_json_body_is_decode_error() {
        let t = RecordingTransport::replying(Ok(HttpResponse::new(502, "Bad Gateway")));
        let client = AdvisorClient::new("http://api.test", &t);
        let err = block_on(client.recommendations("Paris")).unwrap_err();
        assert!(matches!(err, AdvisorError::Decode(_)));
    }

    #[test]
    fn transport_failure_is_reported() {
        let t = RecordingTransport::replying(Err(TransportError::Network("refused".into())));
        let client = AdvisorClient::new("http://api.test", &t);
        let err = block_on(client.climate_impact("Paris")).unwrap_err();
        assert_eq!(
            err,
            AdvisorError::Transport(TransportError::Network("refused".into()))
        );
    }
}
