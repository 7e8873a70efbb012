//! Keyrelay - key-selecting reverse proxy for the Groq and Gemini APIs
//!
//! Callers hand over one or more raw API keys; the proxy picks one per
//! request, authenticates the upstream call with it and streams the upstream
//! response back with a small set of normalized headers.

pub mod config;
pub mod error;
pub mod proxy;
pub mod routes;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;

pub use crate::config::Config;
pub use crate::proxy::{
    Delegate, GeminiProxy, GroqProxy, KeyChooser, OpenAiCompatDelegate, RandomChooser,
    VerifyDelegate,
};

/// Application state shared across all request handlers
///
/// Holds no per-request data; every field is either immutable or a
/// connection pool.
pub struct AppState {
    /// Groq upstream (`/groq/*`)
    pub groq: GroqProxy,
    /// Gemini upstream (catch-all)
    pub gemini: GeminiProxy,
    /// Source of randomness for key selection
    pub key_chooser: Arc<dyn KeyChooser>,
    /// Handler for OpenAI-shaped paths
    pub openai_delegate: Arc<dyn Delegate>,
    /// Handler for `POST /verify`
    pub verify_delegate: Arc<dyn Delegate>,
}

impl AppState {
    /// Create a new application state with uniform random key selection
    pub fn new(config: Config) -> Result<Self> {
        Self::with_key_chooser(config, Arc::new(RandomChooser))
    }

    /// Create a new application state with a custom key chooser
    pub fn with_key_chooser(config: Config, key_chooser: Arc<dyn KeyChooser>) -> Result<Self> {
        // Initialize HTTP client with connection pooling
        let http_client = reqwest::Client::builder()
            .pool_max_idle_per_host(100)
            .connect_timeout(Duration::from_secs(config.upstream_connect_timeout_seconds))
            .timeout(Duration::from_secs(config.upstream_timeout_seconds))
            .build()?;

        let groq = GroqProxy::new(http_client.clone(), &config.groq_api_url);
        let gemini = GeminiProxy::new(http_client.clone(), &config.gemini_api_url);

        let openai_delegate: Arc<dyn Delegate> = Arc::new(OpenAiCompatDelegate::new(
            http_client.clone(),
            &config.openai_compat_api_url,
            key_chooser.clone(),
        ));
        let verify_delegate: Arc<dyn Delegate> = Arc::new(VerifyDelegate::new(
            http_client,
            &config.gemini_api_url,
        ));

        Ok(Self {
            groq,
            gemini,
            key_chooser,
            openai_delegate,
            verify_delegate,
        })
    }

    /// Replace the delegates, e.g. with stubs in tests
    pub fn with_delegates(
        mut self,
        openai_delegate: Arc<dyn Delegate>,
        verify_delegate: Arc<dyn Delegate>,
    ) -> Self {
        self.openai_delegate = openai_delegate;
        self.verify_delegate = verify_delegate;
        self
    }
}
