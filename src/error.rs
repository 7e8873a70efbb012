//! Error types for Keyrelay
//!
//! Every failure is turned into a plain-text response at the handler
//! boundary. Non-2xx upstream responses are not errors; they are relayed.

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Application-level errors
#[derive(Debug, Error)]
pub enum AppError {
    /// No key could be resolved for an upstream that requires one
    #[error("No {upstream} API Key provided in {header} or Authorization header")]
    NoCredential {
        upstream: &'static str,
        header: &'static str,
    },

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Invalid upstream URL {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Failed to read request body: {0}")]
    Body(#[from] axum::Error),

    #[error("HTTP client error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// HTTP status reported to the caller
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NoCredential { .. } => StatusCode::UNAUTHORIZED,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidUrl { .. }
            | AppError::Body(_)
            | AppError::HttpError(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            AppError::NoCredential { .. } | AppError::BadRequest(_) => self.to_string(),
            _ => format!("Internal Server Error: {}", self),
        };

        (
            status,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            message,
        )
            .into_response()
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;
