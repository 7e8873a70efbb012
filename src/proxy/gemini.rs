//! Gemini proxy
//!
//! Forwards every request the router does not claim to the Gemini API,
//! path and query unchanged. The request body is streamed through without
//! buffering so large payloads are never held in memory.

use axum::body::Body;
use axum::http::{HeaderMap, Method, Response, Uri};
use tracing::Instrument;

use crate::error::AppResult;
use crate::proxy::credentials::{select_key, KeyChooser, GEMINI_KEY_HEADER};
use crate::proxy::headers::build_gemini_headers;
use crate::proxy::logging::RequestContext;
use crate::proxy::relay::{relay_response, streaming_body, target_url};

/// Gemini upstream client
pub struct GeminiProxy {
    client: reqwest::Client,
    base_url: String,
}

impl GeminiProxy {
    /// Create a new Gemini proxy
    pub fn new(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.to_string(),
        }
    }

    /// Forward one request and relay the upstream response
    ///
    /// A missing key is not an error here: the request goes out without
    /// `x-goog-api-key` and the upstream decides.
    pub async fn forward(
        &self,
        method: Method,
        uri: &Uri,
        headers: &HeaderMap,
        body: Body,
        chooser: &dyn KeyChooser,
    ) -> AppResult<Response<Body>> {
        let ctx = RequestContext::new("gemini", method.as_str(), uri.path());
        ctx.log_request_start();

        let result = self
            .dispatch(&ctx, method, uri, headers, body, chooser)
            .instrument(ctx.create_span())
            .await;

        if let Err(err) = &result {
            ctx.log_failure(err);
        }
        result
    }

    async fn dispatch(
        &self,
        ctx: &RequestContext,
        method: Method,
        uri: &Uri,
        headers: &HeaderMap,
        body: Body,
        chooser: &dyn KeyChooser,
    ) -> AppResult<Response<Body>> {
        let api_key = select_key(headers, GEMINI_KEY_HEADER, chooser);
        ctx.log_key_selected(api_key.as_deref());

        let url = target_url(&self.base_url, uri.path(), uri.query())?;
        let outbound_headers = build_gemini_headers(headers, api_key.as_deref())?;

        ctx.log_upstream_request(url.as_str(), None);

        let mut request = self
            .client
            .request(method.clone(), url)
            .headers(outbound_headers);
        if let Some(body) = streaming_body(&method, body) {
            request = request.body(body);
        }

        let response = request.send().await?;
        ctx.log_upstream_response(response.status().as_u16(), response.content_length());

        Ok(relay_response(response))
    }
}
