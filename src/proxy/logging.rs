//! Request logging utilities for upstream proxying
//!
//! Provides structured logging with short correlation IDs so one proxied
//! exchange can be followed across the key selection, dispatch and relay
//! steps.

use std::time::Instant;
use tracing::{debug, error, info, warn, Span};
use uuid::Uuid;

use crate::error::AppError;
use crate::proxy::credentials::mask_key;

/// Context for tracking a proxied request
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Unique identifier for this request (for log correlation)
    pub trace_id: String,
    /// When the request started
    pub start_time: Instant,
    /// Upstream handling this request
    pub upstream: &'static str,
    /// HTTP method of the inbound request
    pub method: String,
    /// Inbound path, without query
    pub path: String,
}

impl RequestContext {
    /// Create a new request context
    pub fn new(upstream: &'static str, method: &str, path: &str) -> Self {
        Self {
            trace_id: Uuid::new_v4().to_string()[..8].to_string(), // Short ID for readability
            start_time: Instant::now(),
            upstream,
            method: method.to_string(),
            path: path.to_string(),
        }
    }

    /// Get elapsed time in milliseconds
    pub fn elapsed_ms(&self) -> u128 {
        self.start_time.elapsed().as_millis()
    }

    /// Log request initiation
    pub fn log_request_start(&self) {
        debug!(
            trace_id = %self.trace_id,
            upstream = %self.upstream,
            method = %self.method,
            path = %self.path,
            "Request started"
        );
    }

    /// Log the key chosen for this request (masked)
    pub fn log_key_selected(&self, key: Option<&str>) {
        match key {
            Some(key) => debug!(
                trace_id = %self.trace_id,
                upstream = %self.upstream,
                key = %mask_key(key),
                "Selected API key"
            ),
            None => debug!(
                trace_id = %self.trace_id,
                upstream = %self.upstream,
                "No API key supplied, forwarding without upstream credential"
            ),
        }
    }

    /// Log request being sent to upstream
    pub fn log_upstream_request(&self, url: &str, body_size: Option<usize>) {
        info!(
            trace_id = %self.trace_id,
            upstream = %self.upstream,
            method = %self.method,
            url = %url,
            body_size = ?body_size,
            "Forwarding request"
        );
    }

    /// Log response received from upstream
    pub fn log_upstream_response(&self, status: u16, content_length: Option<u64>) {
        info!(
            trace_id = %self.trace_id,
            upstream = %self.upstream,
            path = %self.path,
            status = %status,
            content_length = ?content_length,
            elapsed_ms = %self.elapsed_ms(),
            "Response received from upstream"
        );
    }

    /// Log a request rejected before reaching the upstream
    pub fn log_rejected(&self, reason: &str) {
        warn!(
            trace_id = %self.trace_id,
            upstream = %self.upstream,
            path = %self.path,
            reason = %reason,
            "Request rejected"
        );
    }

    /// Log request failure
    pub fn log_error(&self, error: &str) {
        error!(
            trace_id = %self.trace_id,
            upstream = %self.upstream,
            method = %self.method,
            path = %self.path,
            elapsed_ms = %self.elapsed_ms(),
            error = %error,
            "Request failed"
        );
    }

    /// Log a failed exchange at the level its status warrants
    pub fn log_failure(&self, err: &AppError) {
        if err.status().is_server_error() {
            self.log_error(&err.to_string());
        } else {
            self.log_rejected(&err.to_string());
        }
    }

    /// Create a tracing span for this request
    pub fn create_span(&self) -> Span {
        tracing::info_span!(
            "proxy_request",
            trace_id = %self.trace_id,
            upstream = %self.upstream,
            path = %self.path,
        )
    }
}
