//! Outbound request assembly and response relay shared by every upstream

use axum::body::{Body, HttpBody};
use axum::http::{Method, Response};
use reqwest::Url;

use crate::error::{AppError, AppResult};
use crate::proxy::headers::normalize_response_headers;

/// Join an upstream base, a path suffix and the raw inbound query
pub fn target_url(base_url: &str, path: &str, query: Option<&str>) -> AppResult<Url> {
    let mut url = format!("{}{}", base_url, path);
    if let Some(query) = query.filter(|q| !q.is_empty()) {
        url.push('?');
        url.push_str(query);
    }

    Url::parse(&url).map_err(|source| AppError::InvalidUrl { url, source })
}

/// Pass the inbound body through as a live stream
///
/// GET/HEAD requests and bodies that are already finished go out without a
/// body so the upstream does not see an empty chunked payload.
pub fn streaming_body(method: &Method, body: Body) -> Option<reqwest::Body> {
    if *method == Method::GET || *method == Method::HEAD || body.is_end_stream() {
        return None;
    }

    Some(reqwest::Body::wrap_stream(body.into_data_stream()))
}

/// Convert an upstream response into the caller's response
///
/// Status and body pass through unchanged; the body is streamed chunk by
/// chunk and dropped together with the caller's connection.
pub fn relay_response(response: reqwest::Response) -> Response<Body> {
    let status = response.status();
    let headers = normalize_response_headers(response.headers());

    let mut relayed = Response::new(Body::from_stream(response.bytes_stream()));
    *relayed.status_mut() = status;
    *relayed.headers_mut() = headers;
    relayed
}
