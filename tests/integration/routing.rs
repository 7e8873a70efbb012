//! Routing integration tests
//!
//! Preflight, landing page and delegate selection, checked through the
//! real router with stub delegates.

use axum::http::{header, Method, StatusCode};
use pretty_assertions::assert_eq;

use crate::common::{server_for_state, test_state, StubDelegate, TestApp};
use crate::mocks::MockUpstream;

#[tokio::test]
async fn test_preflight_is_answered_locally() {
    let app = TestApp::start(0).await;

    for target in ["/v1beta/models/foo:generateContent", "/groq/chat/completions", "/"] {
        let response = app.server.method(Method::OPTIONS, target).await;

        assert_eq!(response.status_code(), StatusCode::OK);
        assert!(response.as_bytes().is_empty());
        let headers = response.headers();
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert_eq!(
            headers[header::ACCESS_CONTROL_ALLOW_METHODS],
            "GET, POST, PUT, DELETE, OPTIONS"
        );
        assert_eq!(
            headers[header::ACCESS_CONTROL_ALLOW_HEADERS],
            "Content-Type, Authorization, x-goog-api-key, x-groq-api-key"
        );
    }

    assert!(app.groq.received().await.is_empty());
    assert!(app.gemini.received().await.is_empty());
}

#[tokio::test]
async fn test_landing_page() {
    let app = TestApp::start(0).await;

    for target in ["/", "/index.html"] {
        let response = app.server.get(target).await;

        assert_eq!(response.status_code(), StatusCode::OK);
        assert!(response.headers()[header::CONTENT_TYPE]
            .to_str()
            .unwrap()
            .starts_with("text/html"));
        assert!(response.text().contains("Keyrelay is running"));
    }

    assert!(app.gemini.received().await.is_empty());
}

#[tokio::test]
async fn test_openai_suffixes_go_to_openai_delegate() {
    let groq = MockUpstream::start().await;
    let gemini = MockUpstream::start().await;
    let openai = StubDelegate::new("openai-stub");
    let verify = StubDelegate::new("verify-stub");
    let state = test_state(
        crate::common::test_config(&groq.uri(), &gemini.uri()),
        0,
    )
    .with_delegates(openai.clone(), verify.clone());
    let server = server_for_state(state);

    for target in [
        "/v1/chat/completions",
        "/v1/completions",
        "/v1/embeddings",
        "/v1beta/models",
    ] {
        let response = server.post(target).await;
        assert_eq!(response.text(), "openai-stub");
    }

    assert_eq!(openai.calls(), 4);
    assert_eq!(verify.calls(), 0);
    assert!(gemini.received().await.is_empty());
}

#[tokio::test]
async fn test_verify_requires_post() {
    let groq = MockUpstream::start().await;
    let gemini = MockUpstream::start().await;
    gemini
        .mock_json("GET", "/verify", 404, serde_json::json!({}))
        .await;
    let openai = StubDelegate::new("openai-stub");
    let verify = StubDelegate::new("verify-stub");
    let state = test_state(
        crate::common::test_config(&groq.uri(), &gemini.uri()),
        0,
    )
    .with_delegates(openai.clone(), verify.clone());
    let server = server_for_state(state);

    let response = server.post("/verify").await;
    assert_eq!(response.text(), "verify-stub");

    // GET falls through to the Gemini catch-all
    let response = server.get("/verify").await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);

    assert_eq!(verify.calls(), 1);
    assert_eq!(gemini.received().await.len(), 1);
}
