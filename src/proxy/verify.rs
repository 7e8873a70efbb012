//! Key verification delegate
//!
//! `POST /verify` probes every Gemini key the caller supplies against the
//! models listing and reports which ones the upstream accepts.

use async_trait::async_trait;
use axum::body::Body;
use axum::extract::Request;
use axum::http::{HeaderName, HeaderValue, Response};
use axum::response::IntoResponse;
use axum::Json;
use futures::future::join_all;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::{AppError, AppResult};
use crate::proxy::credentials::{candidate_keys, mask_key, GEMINI_KEY_HEADER};
use crate::proxy::delegate::Delegate;
use crate::proxy::relay::target_url;

/// Path probed for each key
const PROBE_PATH: &str = "/v1beta/models";

/// Outcome for a single key
#[derive(Debug, Serialize, PartialEq)]
pub struct KeyCheck {
    /// Masked key, never the full value
    pub key: String,
    pub valid: bool,
    /// Upstream status, absent when the probe never got a response
    pub status: Option<u16>,
    pub error: Option<String>,
}

/// Response body of `POST /verify`
#[derive(Debug, Serialize)]
pub struct VerifyResponse {
    pub results: Vec<KeyCheck>,
}

/// Checks Gemini keys against the upstream
pub struct VerifyDelegate {
    client: reqwest::Client,
    base_url: String,
}

impl VerifyDelegate {
    /// Create a new verification delegate
    pub fn new(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.to_string(),
        }
    }

    /// Probe one key
    async fn check_key(&self, key: &str) -> KeyCheck {
        let masked = mask_key(key);

        let url = match target_url(&self.base_url, PROBE_PATH, None) {
            Ok(url) => url,
            Err(e) => return KeyCheck::failed(masked, None, e.to_string()),
        };
        let value = match HeaderValue::from_str(key) {
            Ok(value) => value,
            Err(e) => return KeyCheck::failed(masked, None, e.to_string()),
        };

        let response = match self
            .client
            .get(url)
            .header(HeaderName::from_static(GEMINI_KEY_HEADER), value)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!(key = %masked, error = %e, "Key probe failed");
                return KeyCheck::failed(masked, None, e.to_string());
            }
        };

        let status = response.status();
        if status.is_success() {
            debug!(key = %masked, "Key accepted by upstream");
            return KeyCheck {
                key: masked,
                valid: true,
                status: Some(status.as_u16()),
                error: None,
            };
        }

        let text = response.text().await.unwrap_or_default();
        KeyCheck::failed(masked, Some(status.as_u16()), upstream_error_message(&text))
    }
}

impl KeyCheck {
    fn failed(key: String, status: Option<u16>, error: String) -> Self {
        Self {
            key,
            valid: false,
            status,
            error: Some(error),
        }
    }
}

/// Pull `error.message` out of a Google error body, falling back to the raw text
fn upstream_error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| value["error"]["message"].as_str().map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string())
}

#[async_trait]
impl Delegate for VerifyDelegate {
    fn name(&self) -> &'static str {
        "verify"
    }

    async fn handle(&self, request: Request) -> AppResult<Response<Body>> {
        let keys = candidate_keys(request.headers(), GEMINI_KEY_HEADER);
        if keys.is_empty() {
            return Err(AppError::BadRequest(format!(
                "No API keys provided in {} or Authorization header",
                GEMINI_KEY_HEADER
            )));
        }

        let results = join_all(keys.iter().map(|key| self.check_key(key))).await;
        let valid = results.iter().filter(|check| check.valid).count();
        info!(total = results.len(), valid, "Verified API keys");

        Ok(Json(VerifyResponse { results }).into_response())
    }
}
