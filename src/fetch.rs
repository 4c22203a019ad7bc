//! HTTP fetch seam
//!
//! [`Fetcher`] is the injected GET implementation used by the sync client.
//! [`HttpFetcher`] is the reqwest-backed one used by the binary; tests swap in
//! fakes.

use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while fetching a URL
#[derive(Debug, Error)]
pub enum FetchError {
    /// HTTP request failed before a response was read
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// Server answered with a non-2xx status
    #[error("HTTP error! Status: {0}")]
    Status(u16),

    /// Request did not finish within the timeout and was dropped
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// Transport failure reported by a non-reqwest fetcher
    #[error("Network failure: {0}")]
    Network(String),
}

/// A GET request with extra headers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
}

impl FetchRequest {
    /// Creates a request with an `Accept: application/json` header
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            headers: vec![("Accept".to_string(), "application/json".to_string())],
        }
    }

    /// Adds a header
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

/// A response body with its status code
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    pub status: u16,
    pub body: String,
}

impl FetchResponse {
    /// Whether the status is in the 2xx range
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Issues GET requests
///
/// Implementations return non-2xx responses as `Ok`; status checks happen in
/// the caller. Dropping the returned future must abort the request.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn get(&self, request: FetchRequest) -> Result<FetchResponse, FetchError>;
}

#[async_trait]
impl<T: Fetcher + ?Sized> Fetcher for Arc<T> {
    async fn get(&self, request: FetchRequest) -> Result<FetchResponse, FetchError> {
        (**self).get(request).await
    }
}

/// Fetcher backed by a reqwest client
#[derive(Debug, Clone, Default)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Create a new HttpFetcher with default settings
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }

    /// Create a new HttpFetcher with a custom HTTP client
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn get(&self, request: FetchRequest) -> Result<FetchResponse, FetchError> {
        let mut builder = self.client.get(&request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        Ok(FetchResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_defaults_to_json_accept() {
        let request = FetchRequest::get("https://example.com/settings");
        assert_eq!(request.url, "https://example.com/settings");
        assert_eq!(
            request.headers,
            vec![("Accept".to_string(), "application/json".to_string())]
        );
    }

    #[test]
    fn test_request_header_builder() {
        let request = FetchRequest::get("https://example.com").header("X-Carrier-Auth", "key");
        assert!(request
            .headers
            .contains(&("X-Carrier-Auth".to_string(), "key".to_string())));
    }

    #[test]
    fn test_response_success_range() {
        let ok = FetchResponse {
            status: 204,
            body: String::new(),
        };
        let not_found = FetchResponse {
            status: 404,
            body: String::new(),
        };
        assert!(ok.is_success());
        assert!(!not_found.is_success());
    }

    #[tokio::test]
    async fn test_http_fetcher_reports_connection_failure() {
        // Nothing listens on the discard port locally.
        let fetcher = HttpFetcher::new();
        let result = fetcher.get(FetchRequest::get("http://127.0.0.1:9/settings")).await;
        assert!(matches!(result, Err(FetchError::RequestFailed(_))));
    }
}
