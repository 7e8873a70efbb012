//! Delegate abstraction
//!
//! Side handlers that the router hands a whole request to (key verification,
//! the OpenAI-compatible surface). They share nothing with the proxy
//! branches, so they sit behind a trait and can be swapped out in tests.

use async_trait::async_trait;
use axum::body::Body;
use axum::extract::Request;
use axum::http::Response;

use crate::error::AppResult;

/// A self-contained request handler invoked by the router
#[async_trait]
pub trait Delegate: Send + Sync {
    /// Name used in logs and metrics
    fn name(&self) -> &'static str;

    /// Handle the inbound request end to end
    async fn handle(&self, request: Request) -> AppResult<Response<Body>>;
}
