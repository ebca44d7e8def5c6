//! Cross-origin response headers.
//!
//! # Responsibilities
//! - Define the CORS header set sent on every response
//! - Provide a tower layer that stamps them onto responses
//!
//! # Design Decisions
//! - Applied as the outermost layer so framework-generated responses
//!   (405, 413, timeouts) carry the headers too
//! - Values override anything the upstream or a handler set

use axum::http::{header, HeaderName, HeaderValue};
use tower::layer::util::{Identity, Stack};
use tower::ServiceBuilder;
use tower_http::set_header::SetResponseHeaderLayer;

pub const ALLOW_ORIGIN: &str = "*";
pub const ALLOW_METHODS: &str = "GET, POST, PUT, DELETE, PATCH, OPTIONS";
pub const ALLOW_HEADERS: &str = "Content-Type, X-Appwrite-Project, X-Appwrite-Key";

/// The CORS headers, in the order they are written.
pub fn cors_headers() -> [(HeaderName, HeaderValue); 3] {
    [
        (
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static(ALLOW_ORIGIN),
        ),
        (
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(ALLOW_METHODS),
        ),
        (
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(ALLOW_HEADERS),
        ),
    ]
}

type SetHeader = SetResponseHeaderLayer<HeaderValue>;

/// Layer adding the CORS headers to every response.
pub type CorsLayer = ServiceBuilder<Stack<SetHeader, Stack<SetHeader, Stack<SetHeader, Identity>>>>;

pub fn cors_layer() -> CorsLayer {
    let [origin, methods, headers] = cors_headers();
    ServiceBuilder::new()
        .layer(SetResponseHeaderLayer::overriding(origin.0, origin.1))
        .layer(SetResponseHeaderLayer::overriding(methods.0, methods.1))
        .layer(SetResponseHeaderLayer::overriding(headers.0, headers.1))
}
