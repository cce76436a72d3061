//! HTTP transport abstraction
//!
//! The gateway only builds requests and interprets responses. Sending them is
//! delegated to an [`HttpTransport`], so connection pooling, TLS and retry
//! policy stay outside the client and tests can inject a mock.
//!
//! # Example
//!
//! ```no_run
//! use kraken_rest::transport::{HttpRequest, HttpTransport, ReqwestTransport, TransportError};
//! use std::time::Duration;
//!
//! async fn example() -> Result<(), TransportError> {
//!     let transport = ReqwestTransport::new()?;
//!     let response = transport
//!         .post(HttpRequest {
//!             url: "https://api.kraken.com/0/public/Time".to_string(),
//!             headers: Vec::new(),
//!             body: String::new(),
//!             timeout: Duration::from_secs(5),
//!         })
//!         .await?;
//!     println!("{}: {}", response.status, response.body);
//!     Ok(())
//! }
//! ```

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, instrument};

/// Transport layer errors
#[derive(Error, Debug)]
pub enum TransportError {
    /// No response within the request timeout
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// Connection could not be established
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Request failed after connecting (or the body could not be read)
    #[error("request failed: {0}")]
    RequestFailed(String),

    /// Request could not be built (malformed URL or header); never sent
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

/// A fully built POST request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    /// Absolute URL
    pub url: String,
    /// Header name/value pairs, in the order they were added
    pub headers: Vec<(String, String)>,
    /// URL-encoded form body
    pub body: String,
    /// Request timeout
    pub timeout: Duration,
}

impl HttpRequest {
    /// Get a header value by case-insensitive name
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Raw response as received
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status code (not used for classification)
    pub status: u16,
    /// Response body
    pub body: String,
}

/// Trait for HTTP transport abstraction
///
/// Implementations must honor [`HttpRequest::timeout`].
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Send a POST request and return the raw response
    async fn post(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// Real HTTP transport using reqwest
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Create a transport with a default connection pool
    pub fn new() -> Result<Self, TransportError> {
        let client = Client::builder()
            .build()
            .map_err(|e| TransportError::ConnectionFailed(e.to_string()))?;

        Ok(Self { client })
    }

    /// Use an existing reqwest client (shared pool, proxies, custom TLS)
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    fn map_error(error: reqwest::Error, timeout: Duration) -> TransportError {
        if error.is_builder() {
            TransportError::InvalidRequest(error.to_string())
        } else if error.is_timeout() {
            TransportError::Timeout(timeout)
        } else if error.is_connect() {
            TransportError::ConnectionFailed(error.to_string())
        } else {
            TransportError::RequestFailed(error.to_string())
        }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    #[instrument(skip(self, request), fields(url = %request.url))]
    async fn post(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let timeout = request.timeout;
        let mut builder = self.client.post(&request.url).timeout(timeout);

        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = builder
            .body(request.body)
            .send()
            .await
            .map_err(|e| Self::map_error(e, timeout))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| Self::map_error(e, timeout))?;

        debug!(status, len = body.len(), "HTTP response received");

        Ok(HttpResponse { status, body })
    }
}

/// Mock transport for testing
///
/// Returns queued responses in order and records every request it is given.
#[cfg(any(test, feature = "test-utils"))]
#[derive(Default)]
pub struct MockTransport {
    responses: parking_lot::Mutex<std::collections::VecDeque<Result<HttpResponse, TransportError>>>,
    requests: parking_lot::Mutex<Vec<HttpRequest>>,
}

#[cfg(any(test, feature = "test-utils"))]
impl MockTransport {
    /// Create a mock with no queued responses
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a 200 response with the given body
    pub fn push_response(&self, body: impl Into<String>) {
        self.responses.lock().push_back(Ok(HttpResponse {
            status: 200,
            body: body.into(),
        }));
    }

    /// Queue a transport failure
    pub fn push_error(&self, error: TransportError) {
        self.responses.lock().push_back(Err(error));
    }

    /// Requests seen so far
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().clone()
    }

    /// Number of requests seen so far
    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }
}

#[cfg(any(test, feature = "test-utils"))]
#[async_trait]
impl HttpTransport for MockTransport {
    async fn post(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests.lock().push(request);
        self.responses
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::ConnectionFailed("no mock response queued".into())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> HttpRequest {
        HttpRequest {
            url: "https://mock.test/0/public/Time".to_string(),
            headers: vec![("API-Key".to_string(), "key".to_string())],
            body: String::new(),
            timeout: Duration::from_secs(5),
        }
    }

    #[test]
    fn test_header_lookup_is_case_insensitive() {
        let request = request();
        assert_eq!(request.header("api-key"), Some("key"));
        assert_eq!(request.header("API-Sign"), None);
    }

    #[tokio::test]
    async fn test_mock_transport_records_and_replies() {
        let transport = MockTransport::new();
        transport.push_response(r#"{"error":[]}"#);

        let response = transport.post(request()).await.unwrap();
        assert_eq!(response.status, 200);
        assert_eq!(response.body, r#"{"error":[]}"#);
        assert_eq!(transport.request_count(), 1);
        assert_eq!(transport.requests()[0].url, "https://mock.test/0/public/Time");
    }

    #[tokio::test]
    async fn test_mock_transport_errors() {
        let transport = MockTransport::new();
        transport.push_error(TransportError::Timeout(Duration::from_secs(5)));

        let result = transport.post(request()).await;
        assert!(matches!(result, Err(TransportError::Timeout(_))));

        // Empty queue
        let result = transport.post(request()).await;
        assert!(matches!(result, Err(TransportError::ConnectionFailed(_))));
    }

    #[tokio::test]
    async fn test_reqwest_rejects_malformed_header_before_sending() {
        let transport = ReqwestTransport::new().unwrap();
        let mut request = request();
        request.url = "http://127.0.0.1:9/0/public/Time".to_string();
        request.headers = vec![("API-Key".to_string(), "bad\nkey".to_string())];

        let result = transport.post(request).await;
        assert!(matches!(result, Err(TransportError::InvalidRequest(_))));
    }
}
