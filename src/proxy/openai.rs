//! OpenAI-compatible delegate
//!
//! Handles OpenAI-shaped requests (`.../chat/completions`, `.../models`, ...)
//! by forwarding them to Gemini's OpenAI-compatible surface, authenticated
//! with a key picked from the caller's Gemini credentials.

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::extract::Request;
use axum::http::Response;
use tracing::Instrument;

use crate::error::{AppError, AppResult};
use crate::proxy::credentials::{select_key, KeyChooser, GEMINI_KEY_HEADER};
use crate::proxy::delegate::Delegate;
use crate::proxy::headers::build_bearer_headers;
use crate::proxy::logging::RequestContext;
use crate::proxy::relay::{relay_response, streaming_body, target_url};

/// Path suffixes served by this delegate, longest match first
pub const OPENAI_COMPAT_SUFFIXES: &[&str] =
    &["/chat/completions", "/completions", "/embeddings", "/models"];

/// Return the OpenAI endpoint suffix a path ends with, if any
pub fn openai_suffix(path: &str) -> Option<&'static str> {
    OPENAI_COMPAT_SUFFIXES
        .iter()
        .copied()
        .find(|suffix| path.ends_with(*suffix))
}

/// Client for Gemini's OpenAI-compatible endpoints
pub struct OpenAiCompatDelegate {
    client: reqwest::Client,
    base_url: String,
    chooser: Arc<dyn KeyChooser>,
}

impl OpenAiCompatDelegate {
    /// Create a new OpenAI-compatible delegate
    pub fn new(client: reqwest::Client, base_url: &str, chooser: Arc<dyn KeyChooser>) -> Self {
        Self {
            client,
            base_url: base_url.to_string(),
            chooser,
        }
    }

    async fn forward(&self, ctx: &RequestContext, request: Request) -> AppResult<Response<Body>> {
        let (parts, body) = request.into_parts();

        let api_key = select_key(&parts.headers, GEMINI_KEY_HEADER, self.chooser.as_ref())
            .ok_or(AppError::NoCredential {
                upstream: "Gemini",
                header: GEMINI_KEY_HEADER,
            })?;
        ctx.log_key_selected(Some(&api_key));

        let suffix = openai_suffix(parts.uri.path()).ok_or_else(|| {
            AppError::BadRequest(format!(
                "Not an OpenAI-compatible endpoint: {}",
                parts.uri.path()
            ))
        })?;
        let url = target_url(&self.base_url, suffix, parts.uri.query())?;
        let headers = build_bearer_headers(&parts.headers, &api_key)?;

        ctx.log_upstream_request(url.as_str(), None);

        let mut outbound = self
            .client
            .request(parts.method.clone(), url)
            .headers(headers);
        if let Some(body) = streaming_body(&parts.method, body) {
            outbound = outbound.body(body);
        }

        let response = outbound.send().await?;
        ctx.log_upstream_response(response.status().as_u16(), response.content_length());

        Ok(relay_response(response))
    }
}

#[async_trait]
impl Delegate for OpenAiCompatDelegate {
    fn name(&self) -> &'static str {
        "openai-compat"
    }

    async fn handle(&self, request: Request) -> AppResult<Response<Body>> {
        let ctx = RequestContext::new(self.name(), request.method().as_str(), request.uri().path());
        ctx.log_request_start();

        let result = self
            .forward(&ctx, request)
            .instrument(ctx.create_span())
            .await;

        if let Err(err) = &result {
            ctx.log_failure(err);
        }
        result
    }
}
