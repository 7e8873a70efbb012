//! Mock upstream API for testing
//!
//! Provides a wiremock server with helpers for the response shapes Groq and
//! Gemini return, and accessors for the requests the proxy forwarded.
//!
//! # Example
//!
//! ```rust,ignore
//! let upstream = MockUpstream::start().await;
//! upstream.mock_json("GET", "/openai/v1/models", 200, json!({"data": []})).await;
//! // point the proxy at upstream.uri() ...
//! let forwarded = upstream.single_request().await;
//! ```

use serde_json::Value;
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, Request, ResponseTemplate,
};

/// Mock upstream server wrapper
pub struct MockUpstream {
    server: MockServer,
}

impl MockUpstream {
    /// Start a new mock upstream
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        Self { server }
    }

    /// Get the mock server URI
    pub fn uri(&self) -> String {
        self.server.uri()
    }

    /// Access the underlying server to mount custom mocks
    pub fn server(&self) -> &MockServer {
        &self.server
    }

    /// Mock a JSON response for a method and path
    pub async fn mock_json(&self, http_method: &str, url_path: &str, status: u16, body: Value) {
        Mock::given(method(http_method))
            .and(path(url_path))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    /// Mock a JSON response carrying hop-specific headers the proxy must strip
    pub async fn mock_json_with_transport_headers(
        &self,
        http_method: &str,
        url_path: &str,
        body: Value,
    ) {
        Mock::given(method(http_method))
            .and(path(url_path))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(body)
                    .insert_header("content-encoding", "identity")
                    .insert_header("keep-alive", "timeout=5")
                    .insert_header("x-upstream-request-id", "req-123"),
            )
            .mount(&self.server)
            .await;
    }

    /// Mock a server-sent events response
    pub async fn mock_sse(&self, http_method: &str, url_path: &str, body: &str) {
        Mock::given(method(http_method))
            .and(path(url_path))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_raw(body.as_bytes().to_vec(), "text/event-stream")
                    .insert_header("cache-control", "no-cache"),
            )
            .mount(&self.server)
            .await;
    }

    /// All requests received so far
    pub async fn received(&self) -> Vec<Request> {
        self.server
            .received_requests()
            .await
            .expect("Request recording is enabled")
    }

    /// The only request received; fails if there were zero or several
    pub async fn single_request(&self) -> Request {
        let mut requests = self.received().await;
        assert_eq!(requests.len(), 1, "expected exactly one upstream request");
        requests.remove(0)
    }
}

/// Read a header from a recorded request as a string
pub fn header_str<'a>(request: &'a Request, name: &str) -> Option<&'a str> {
    request.headers.get(name).and_then(|value| value.to_str().ok())
}
