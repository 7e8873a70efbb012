//! CORS preflight

use axum::body::Body;
use axum::http::{Response, StatusCode};

use crate::proxy::headers::apply_cors_headers;

/// Answer an `OPTIONS` request locally with an empty 200
pub fn preflight_response() -> Response<Body> {
    let mut response = Response::new(Body::empty());
    *response.status_mut() = StatusCode::OK;
    apply_cors_headers(response.headers_mut());
    response
}
