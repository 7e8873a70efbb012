//! Common test utilities for Keyrelay
//!
//! Builds a real router wired to wiremock upstreams, with key selection
//! pinned to a known index so assertions can name the chosen key.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::extract::Request;
use axum::http::Response;
use axum_test::TestServer;
use keyrelay::error::AppResult;
use keyrelay::{routes, AppState, Config, Delegate, KeyChooser};

use crate::mocks::MockUpstream;

/// Test configuration constants
pub mod constants {
    /// Path of the Groq API under the mock upstream, mirroring the real base
    pub const GROQ_BASE_PATH: &str = "/openai/v1";
    /// Path of the OpenAI-compatible surface under the mock Gemini upstream
    pub const OPENAI_COMPAT_BASE_PATH: &str = "/v1beta/openai";
    /// A port nothing listens on
    pub const UNREACHABLE_URL: &str = "http://127.0.0.1:1";
}

/// Key chooser that always returns the same index
pub struct FixedChooser(pub usize);

impl KeyChooser for FixedChooser {
    fn choose(&self, _len: usize) -> usize {
        self.0
    }
}

/// Delegate stub counting how often the router reached it
pub struct StubDelegate {
    name: &'static str,
    calls: AtomicUsize,
}

impl StubDelegate {
    pub fn new(name: &'static str) -> Arc<Self> {
        Arc::new(Self {
            name,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Delegate for StubDelegate {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn handle(&self, _request: Request) -> AppResult<Response<Body>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Response::new(Body::from(self.name)))
    }
}

/// A proxy under test plus its two mocked upstreams
pub struct TestApp {
    pub server: TestServer,
    pub groq: MockUpstream,
    pub gemini: MockUpstream,
}

impl TestApp {
    /// Start mocked upstreams and a proxy that picks the key at `key_index`
    pub async fn start(key_index: usize) -> Self {
        let groq = MockUpstream::start().await;
        let gemini = MockUpstream::start().await;

        let config = test_config(
            &format!("{}{}", groq.uri(), constants::GROQ_BASE_PATH),
            &gemini.uri(),
        );
        let server = build_server(config, key_index);

        Self {
            server,
            groq,
            gemini,
        }
    }
}

/// Config pointing every upstream at the given bases
pub fn test_config(groq_url: &str, gemini_url: &str) -> Config {
    let mut config = Config::with_upstreams(groq_url, gemini_url);
    config.openai_compat_api_url = format!(
        "{}{}",
        gemini_url.trim_end_matches('/'),
        constants::OPENAI_COMPAT_BASE_PATH
    );
    config.upstream_timeout_seconds = 5;
    config.upstream_connect_timeout_seconds = 2;
    config
}

/// Build the application state for a config
pub fn test_state(config: Config, key_index: usize) -> AppState {
    AppState::with_key_chooser(config, Arc::new(FixedChooser(key_index)))
        .expect("Failed to build application state")
}

/// Build a test server around the real router
pub fn build_server(config: Config, key_index: usize) -> TestServer {
    server_for_state(test_state(config, key_index))
}

/// Build a test server around an existing state
pub fn server_for_state(state: AppState) -> TestServer {
    let app = routes::create_router(Arc::new(state));
    TestServer::new(app).expect("Failed to create test server")
}
