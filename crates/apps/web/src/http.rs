use foundation::http::{HttpResponse, HttpTransport, TransportError};
use gloo_net::http::Request;

/// `fetch` through gloo-net.
#[derive(Debug, Default, Clone, Copy)]
pub struct FetchTransport;

impl HttpTransport for FetchTransport {
    async fn get(&self, url: &str) -> Result<HttpResponse, TransportError> {
        let resp = Request::get(url)
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;
        read(resp).await
    }

    async fn post_json(&self, url: &str, body: String) -> Result<HttpResponse, TransportError> {
        let resp = Request::post(url)
            .header("Content-Type", "application/json")
            .body(body)
            .map_err(|e| TransportError::Network(e.to_string()))?
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;
        read(resp).await
    }
}

async fn read(resp: gloo_net::http::Response) -> Result<HttpResponse, TransportError> {
    let status = resp.status();
    let body = resp
        .text()
        .await
        .map_err(|e| TransportError::Body(e.to_string()))?;
    Ok(HttpResponse::new(status, body))
}
