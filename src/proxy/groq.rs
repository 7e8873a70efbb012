//! Groq proxy
//!
//! Forwards `/groq/*` requests to the Groq OpenAI-compatible API. The
//! inbound body is buffered in full before dispatch so the header rewrite
//! and key selection are settled before anything is sent upstream.

use axum::body::Body;
use axum::http::{HeaderMap, Method, Response, Uri};
use http_body_util::BodyExt;
use tracing::Instrument;

use crate::error::{AppError, AppResult};
use crate::proxy::credentials::{select_key, KeyChooser, GROQ_KEY_HEADER};
use crate::proxy::headers::build_groq_headers;
use crate::proxy::logging::RequestContext;
use crate::proxy::relay::{relay_response, target_url};

/// Path prefix reserved for the Groq upstream
pub const GROQ_ROUTE_PREFIX: &str = "/groq";

/// Groq upstream client
pub struct GroqProxy {
    client: reqwest::Client,
    base_url: String,
}

impl GroqProxy {
    /// Create a new Groq proxy
    pub fn new(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.to_string(),
        }
    }

    /// Forward one request and relay the upstream response
    ///
    /// Failures are logged here with the originating path; the caller only
    /// has to render the returned error.
    pub async fn forward(
        &self,
        method: Method,
        uri: &Uri,
        headers: &HeaderMap,
        body: Body,
        chooser: &dyn KeyChooser,
    ) -> AppResult<Response<Body>> {
        let ctx = RequestContext::new("groq", method.as_str(), uri.path());
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
        let api_key = select_key(headers, GROQ_KEY_HEADER, chooser).ok_or(
            AppError::NoCredential {
                upstream: "Groq",
                header: GROQ_KEY_HEADER,
            },
        )?;
        ctx.log_key_selected(Some(&api_key));

        let path = uri.path();
        let suffix = path.strip_prefix(GROQ_ROUTE_PREFIX).unwrap_or(path);
        let url = target_url(&self.base_url, suffix, uri.query())?;

        let body_bytes = body.collect().await?.to_bytes();
        let outbound_headers = build_groq_headers(headers, &api_key)?;

        ctx.log_upstream_request(url.as_str(), Some(body_bytes.len()));

        let mut request = self.client.request(method, url).headers(outbound_headers);
        // An empty buffer is sent as no body at all
        if !body_bytes.is_empty() {
            request = request.body(body_bytes);
        }

        let response = request.send().await?;
        ctx.log_upstream_response(response.status().as_u16(), response.content_length());

        Ok(relay_response(response))
    }
}
