//! Header utilities for upstream proxying
//!
//! Outbound headers are rebuilt per upstream so caller credentials never
//! reach an upstream in a form the proxy did not choose. Response headers
//! are normalized before they are replayed to the caller.

use axum::http::header::{self, HeaderName};
use axum::http::{HeaderMap, HeaderValue};

use crate::error::{AppError, AppResult};
use crate::proxy::credentials::{GEMINI_KEY_HEADER, GROQ_KEY_HEADER};

/// Hop-by-hop headers that must never be forwarded
const HOP_BY_HOP_HEADERS: &[HeaderName] = &[
    header::CONNECTION,
    header::PROXY_AUTHENTICATE,
    header::PROXY_AUTHORIZATION,
    header::TE,
    header::TRAILER,
    header::TRANSFER_ENCODING,
    header::UPGRADE,
];

/// Not a registered header name, but hop-by-hop all the same
const KEEP_ALIVE: &str = "keep-alive";

/// Caller headers withheld from the Groq upstream
const GROQ_EXCLUDED_HEADERS: &[&str] = &[
    GROQ_KEY_HEADER,
    "authorization",
    "host",
    "origin",
    "referer",
];

/// Framing of the inbound hop; the client recomputes these for the buffered body
const FRAMING_HEADERS: &[HeaderName] = &[header::CONTENT_LENGTH, header::ACCEPT_ENCODING];

/// Upstream response headers that describe the upstream hop only
const STRIPPED_RESPONSE_HEADERS: &[&str] = &[
    "transfer-encoding",
    "connection",
    KEEP_ALIVE,
    "content-encoding",
];

pub const CORS_ALLOW_ORIGIN: &str = "*";
pub const CORS_ALLOW_METHODS: &str = "GET, POST, PUT, DELETE, OPTIONS";
pub const CORS_ALLOW_HEADERS: &str = "Content-Type, Authorization, x-goog-api-key, x-groq-api-key";

/// Check if a header is a hop-by-hop header that should not be forwarded
pub fn is_hop_by_hop_header(name: &HeaderName) -> bool {
    HOP_BY_HOP_HEADERS.contains(name) || name.as_str() == KEEP_ALIVE
}

/// Copy caller headers for the Groq upstream, dropping excluded ones
///
/// Applying this to its own output returns the same set.
pub fn sanitize_groq_headers(incoming: &HeaderMap) -> HeaderMap {
    let mut sanitized = HeaderMap::with_capacity(incoming.len());

    for (name, value) in incoming {
        if GROQ_EXCLUDED_HEADERS.contains(&name.as_str())
            || FRAMING_HEADERS.contains(name)
            || is_hop_by_hop_header(name)
        {
            continue;
        }
        sanitized.append(name.clone(), value.clone());
    }

    sanitized
}

/// Build the outbound header set for the Groq upstream
pub fn build_groq_headers(incoming: &HeaderMap, api_key: &str) -> AppResult<HeaderMap> {
    let mut headers = sanitize_groq_headers(incoming);

    headers.insert(header::AUTHORIZATION, bearer_value(api_key)?);
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );

    Ok(headers)
}

/// Build the outbound header set for the Gemini upstream
///
/// Only the selected key and the caller's content type are forwarded.
pub fn build_gemini_headers(incoming: &HeaderMap, api_key: Option<&str>) -> AppResult<HeaderMap> {
    let mut headers = HeaderMap::new();

    if let Some(key) = api_key {
        let value = HeaderValue::from_str(key).map_err(|e| {
            AppError::Internal(anyhow::anyhow!("Invalid Gemini API key header: {}", e))
        })?;
        headers.insert(HeaderName::from_static(GEMINI_KEY_HEADER), value);
    }
    if let Some(content_type) = incoming.get(header::CONTENT_TYPE) {
        headers.insert(header::CONTENT_TYPE, content_type.clone());
    }

    Ok(headers)
}

/// Build headers for an OpenAI-shaped upstream authenticated by bearer token
pub fn build_bearer_headers(incoming: &HeaderMap, api_key: &str) -> AppResult<HeaderMap> {
    let mut headers = HeaderMap::new();

    for name in [header::CONTENT_TYPE, header::ACCEPT] {
        if let Some(value) = incoming.get(&name) {
            headers.insert(name, value.clone());
        }
    }
    headers.insert(header::AUTHORIZATION, bearer_value(api_key)?);

    Ok(headers)
}

fn bearer_value(api_key: &str) -> AppResult<HeaderValue> {
    HeaderValue::from_str(&format!("Bearer {}", api_key))
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Invalid API key header: {}", e)))
}

/// Normalize upstream response headers before relaying them
///
/// Repeated headers (e.g. `set-cookie`) are preserved.
pub fn normalize_response_headers(upstream: &HeaderMap) -> HeaderMap {
    let mut headers = HeaderMap::with_capacity(upstream.len() + 1);

    for (name, value) in upstream {
        if !STRIPPED_RESPONSE_HEADERS.contains(&name.as_str()) {
            headers.append(name.clone(), value.clone());
        }
    }
    headers.insert(
        header::REFERRER_POLICY,
        HeaderValue::from_static("no-referrer"),
    );

    headers
}

/// Set the permissive CORS headers used by preflight and Groq responses
pub fn apply_cors_headers(headers: &mut HeaderMap) {
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static(CORS_ALLOW_ORIGIN),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(CORS_ALLOW_METHODS),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(CORS_ALLOW_HEADERS),
    );
}
