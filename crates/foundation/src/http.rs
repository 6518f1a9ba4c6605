//! The HTTP seam shared by the geocoding and advisor clients.
//!
//! The browser implements it with `gloo-net`; tests implement it in memory.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The request never produced a response (offline, CORS, DNS...).
    Network(String),
    /// The response body could not be read.
    Body(String),
}

impl std::fmt::Display for TransportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransportError::Network(msg) => write!(f, "network error: {msg}"),
            TransportError::Body(msg) => write!(f, "failed to read response body: {msg}"),
        }
    }
}

impl std::error::Error for TransportError {}

/// Minimal async HTTP client.
///
/// Futures are not required to be `Send`: every caller runs on the browser's
/// single-threaded event loop.
#[allow(async_fn_in_trait)]
pub trait HttpTransport {
    async fn get(&self, url: &str) -> Result<HttpResponse, TransportError>;

    async fn post_json(&self, url: &str, body: String) -> Result<HttpResponse, TransportError>;
}

impl<T: HttpTransport> HttpTransport for &T {
    async fn get(&self, url: &str) -> Result<HttpResponse, TransportError> {
        (**self).get(url).await
    }

    async fn post_json(&self, url: &str, body: String) -> Result<HttpResponse, TransportError> {
        (**self).post_json(url, body).await
    }
}

impl<T: HttpTransport> HttpTransport for std::rc::Rc<T> {
    async fn get(&self, url: &str) -> Result<HttpResponse, TransportError> {
        (**self).get(url).await
    }

    async fn post_json(&self, url: &str, body: String) -> Result<HttpResponse, TransportError> {
        (**self).post_json(url, body).await
    }
}
