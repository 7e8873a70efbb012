//! HTTP routes for Keyrelay
//!
//! There is no route table: every request lands in [`dispatch`], which
//! classifies it into exactly one [`Branch`] and hands it to that branch.
//! Unmatched paths go to Gemini, so the proxy never answers 404 itself.

pub mod landing;
pub mod metrics;
pub mod preflight;

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{Request, State},
    http::Method,
    response::{IntoResponse, Response},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::{
    proxy::{
        groq::GROQ_ROUTE_PREFIX, headers::apply_cors_headers, openai::openai_suffix, Delegate,
    },
    AppState,
};

/// Paths served by the landing page
pub const LANDING_PATHS: &[&str] = &["/", "/index.html"];
/// Path of the key verification delegate
pub const VERIFY_PATH: &str = "/verify";

/// Routing outcome for one inbound request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Branch {
    Preflight,
    Groq,
    Landing,
    Verify,
    OpenAiCompat,
    Gemini,
}

impl Branch {
    /// Classify a request by method and path
    ///
    /// Preflight is answered before anything else so browsers get CORS
    /// headers for every path, `/groq` included. After that the order is
    /// fixed: Groq prefix, landing page, verify, OpenAI suffixes, Gemini.
    pub fn classify(method: &Method, path: &str) -> Self {
        if *method == Method::OPTIONS {
            Branch::Preflight
        } else if path.starts_with(GROQ_ROUTE_PREFIX) {
            Branch::Groq
        } else if LANDING_PATHS.iter().any(|landing| *landing == path) {
            Branch::Landing
        } else if path == VERIFY_PATH && *method == Method::POST {
            Branch::Verify
        } else if openai_suffix(path).is_some() {
            Branch::OpenAiCompat
        } else {
            Branch::Gemini
        }
    }

    /// Label used in logs and metrics
    pub fn label(&self) -> &'static str {
        match self {
            Branch::Preflight => "preflight",
            Branch::Groq => "groq",
            Branch::Landing => "landing",
            Branch::Verify => "verify",
            Branch::OpenAiCompat => "openai_compat",
            Branch::Gemini => "gemini",
        }
    }
}

/// Create the main application router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .fallback(dispatch)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Single entry point for every request
pub async fn dispatch(State(state): State<Arc<AppState>>, request: Request) -> Response {
    let start_time = Instant::now();
    let branch = Branch::classify(request.method(), request.uri().path());

    let response = match branch {
        Branch::Preflight => preflight::preflight_response(),
        Branch::Landing => landing::landing_page().into_response(),
        Branch::Groq => {
            let (parts, body) = request.into_parts();
            let mut response = state
                .groq
                .forward(
                    parts.method,
                    &parts.uri,
                    &parts.headers,
                    body,
                    state.key_chooser.as_ref(),
                )
                .await
                .into_response();
            // Error responses included, so browsers can read a 401
            apply_cors_headers(response.headers_mut());
            response
        }
        Branch::Gemini => {
            let (parts, body) = request.into_parts();
            state
                .gemini
                .forward(
                    parts.method,
                    &parts.uri,
                    &parts.headers,
                    body,
                    state.key_chooser.as_ref(),
                )
                .await
                .into_response()
        }
        Branch::Verify => delegate(state.verify_delegate.as_ref(), request).await,
        Branch::OpenAiCompat => delegate(state.openai_delegate.as_ref(), request).await,
    };

    metrics::record_request(
        branch.label(),
        response.status().as_u16(),
        start_time.elapsed().as_secs_f64(),
    );
    response
}

async fn delegate(delegate: &dyn Delegate, request: Request) -> Response {
    match delegate.handle(request).await {
        Ok(response) => response,
        Err(err) => {
            tracing::warn!(delegate = delegate.name(), error = %err, "Delegate failed");
            err.into_response()
        }
    }
}
