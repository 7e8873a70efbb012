//! Configuration management for Keyrelay
//!
//! Configuration is loaded from environment variables. Every value has a
//! default, so the proxy starts with no environment at all.

use anyhow::{Context, Result};
use std::env;
use std::net::SocketAddr;

/// Default Groq-compatible upstream (OpenAI-shaped surface)
pub const DEFAULT_GROQ_API_URL: &str = "https://api.groq.com/openai/v1";
/// Default Gemini upstream origin
pub const DEFAULT_GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com";
/// Default OpenAI-compatible surface exposed by Gemini
pub const DEFAULT_OPENAI_COMPAT_API_URL: &str =
    "https://generativelanguage.googleapis.com/v1beta/openai";

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,

    /// Groq API base URL; the path after `/groq` is appended to it
    pub groq_api_url: String,
    /// Gemini API base URL; the full inbound path is appended to it
    pub gemini_api_url: String,
    /// Base URL used by the OpenAI-compatible delegate
    pub openai_compat_api_url: String,

    /// Total timeout for one upstream exchange (in seconds)
    pub upstream_timeout_seconds: u64,
    /// Connect timeout for upstream connections (in seconds)
    pub upstream_connect_timeout_seconds: u64,

    /// Address for the Prometheus exporter; disabled when unset
    pub metrics_addr: Option<SocketAddr>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            groq_api_url: DEFAULT_GROQ_API_URL.to_string(),
            gemini_api_url: DEFAULT_GEMINI_API_URL.to_string(),
            openai_compat_api_url: DEFAULT_OPENAI_COMPAT_API_URL.to_string(),
            upstream_timeout_seconds: 300,
            upstream_connect_timeout_seconds: 10,
            metrics_addr: None,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        Ok(Self {
            host: env::var("KEYRELAY_HOST").unwrap_or(defaults.host),
            port: env::var("KEYRELAY_PORT")
                .unwrap_or_else(|_| defaults.port.to_string())
                .parse()
                .context("Invalid KEYRELAY_PORT")?,

            groq_api_url: base_url_var("GROQ_API_URL", &defaults.groq_api_url),
            gemini_api_url: base_url_var("GEMINI_API_URL", &defaults.gemini_api_url),
            openai_compat_api_url: base_url_var(
                "OPENAI_COMPAT_API_URL",
                &defaults.openai_compat_api_url,
            ),

            upstream_timeout_seconds: env::var("UPSTREAM_TIMEOUT_SECONDS")
                .unwrap_or_else(|_| defaults.upstream_timeout_seconds.to_string())
                .parse()
                .context("Invalid UPSTREAM_TIMEOUT_SECONDS")?,
            upstream_connect_timeout_seconds: env::var("UPSTREAM_CONNECT_TIMEOUT_SECONDS")
                .unwrap_or_else(|_| defaults.upstream_connect_timeout_seconds.to_string())
                .parse()
                .context("Invalid UPSTREAM_CONNECT_TIMEOUT_SECONDS")?,

            metrics_addr: env::var("METRICS_ADDR")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .map(|v| v.parse::<SocketAddr>())
                .transpose()
                .context("Invalid METRICS_ADDR")?,
        })
    }

    /// Build a config pointing both proxy branches at the given bases
    pub fn with_upstreams(groq_api_url: &str, gemini_api_url: &str) -> Self {
        Self {
            groq_api_url: groq_api_url.trim_end_matches('/').to_string(),
            gemini_api_url: gemini_api_url.trim_end_matches('/').to_string(),
            ..Self::default()
        }
    }
}

/// Read a base URL, dropping any trailing slash so paths can be appended
fn base_url_var(name: &str, default: &str) -> String {
    env::var(name)
        .unwrap_or_else(|_| default.to_string())
        .trim_end_matches('/')
        .to_string()
}
