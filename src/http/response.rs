//! Response relay.
//!
//! # Responsibilities
//! - Copy upstream status, content type and body back to the caller
//! - Map upstream transport failures to a 500 with a JSON error body
//!
//! # Design Decisions
//! - Upstream status codes are never interpreted; 4xx/5xx are relayed verbatim
//! - Bodies are relayed byte-for-byte
//! - Error bodies are serialized with serde, never formatted by hand
//! - CORS headers are added by the router layer, not here

use axum::{
    body::Body,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::http::upstream::{UpstreamError, UpstreamResponse};

/// JSON body returned when the upstream could not be reached.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn from_upstream(err: &UpstreamError) -> Self {
        Self {
            error: format!("Proxy error: {}", err),
        }
    }
}

/// Relay a successful upstream exchange to the caller.
pub fn relay(upstream: UpstreamResponse) -> Response {
    let mut response = Response::new(Body::from(upstream.body));
    *response.status_mut() = upstream.status;
    response
        .headers_mut()
        .insert(header::CONTENT_TYPE, upstream.content_type);
    response
}

/// Answer a failed upstream exchange with a 500 and a JSON error body.
pub fn error_response(err: &UpstreamError) -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, Json(ErrorBody::from_upstream(err))).into_response()
}

/// Methods the proxy answers, advertised on a 405.
pub const ALLOWED_METHODS: &str = "GET, POST, PUT, PATCH, DELETE, OPTIONS";

/// Refuse a method that is never forwarded.
pub fn method_not_allowed() -> Response {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        [(header::ALLOW, ALLOWED_METHODS)],
    )
        .into_response()
}

/// Empty 200 answer to a CORS preflight.
pub fn preflight() -> Response {
    StatusCode::OK.into_response()
}
