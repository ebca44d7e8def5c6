//! Request translation.
//!
//! # Responsibilities
//! - Pick the upstream request target from the `path` query parameter
//! - Reduce inbound headers to the forwarding allow-list
//! - Decide whether a body is forwarded at all
//!
//! # Design Decisions
//! - The allow-list is fixed: Content-Type, X-Appwrite-Project, X-Appwrite-Key
//! - All three headers are always sent, empty when the caller omitted them
//! - The target path is forwarded as-is, without validation
//! - Other query parameters are dropped

use axum::body::Bytes;
use axum::http::{header, HeaderMap, HeaderName, HeaderValue, Method, Uri};

/// Request target used when the caller gives no `path` query parameter.
pub const DEFAULT_TARGET_PATH: &str = "/v1/databases";

/// Content type assumed when a request or response carries none.
pub const DEFAULT_CONTENT_TYPE: &str = "application/json";

pub const X_APPWRITE_PROJECT: HeaderName = HeaderName::from_static("x-appwrite-project");
pub const X_APPWRITE_KEY: HeaderName = HeaderName::from_static("x-appwrite-key");

/// Query parameter that selects the upstream request target.
const PATH_PARAM: &str = "path";

/// The allow-listed headers forwarded to the upstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForwardHeaders {
    pub content_type: HeaderValue,
    pub project: HeaderValue,
    pub key: HeaderValue,
}

impl ForwardHeaders {
    /// Pick the allow-listed headers out of an inbound header map.
    pub fn from_inbound(headers: &HeaderMap) -> Self {
        let get = |name: &HeaderName, default: &'static str| {
            headers
                .get(name)
                .cloned()
                .unwrap_or_else(|| HeaderValue::from_static(default))
        };

        Self {
            content_type: get(&header::CONTENT_TYPE, DEFAULT_CONTENT_TYPE),
            project: get(&X_APPWRITE_PROJECT, ""),
            key: get(&X_APPWRITE_KEY, ""),
        }
    }

    /// Iterate over the headers in the order they are sent.
    pub fn iter(&self) -> impl Iterator<Item = (HeaderName, &HeaderValue)> {
        [
            (header::CONTENT_TYPE, &self.content_type),
            (X_APPWRITE_PROJECT, &self.project),
            (X_APPWRITE_KEY, &self.key),
        ]
        .into_iter()
    }
}

/// A request ready to be issued against the upstream.
#[derive(Debug, Clone)]
pub struct OutboundRequest {
    pub method: Method,
    pub target_path: String,
    pub headers: ForwardHeaders,
    pub body: Option<Bytes>,
}

impl OutboundRequest {
    /// Translate an inbound request into its upstream counterpart.
    pub fn from_inbound(method: Method, uri: &Uri, headers: &HeaderMap, body: Bytes) -> Self {
        Self {
            method,
            target_path: target_path(uri),
            headers: ForwardHeaders::from_inbound(headers),
            body: forwarded_body(headers, body),
        }
    }
}

/// First non-empty `path` query value, or [`DEFAULT_TARGET_PATH`].
pub fn target_path(uri: &Uri) -> String {
    uri.query()
        .and_then(|query| {
            url::form_urlencoded::parse(query.as_bytes())
                .find(|(name, value)| name == PATH_PARAM && !value.is_empty())
                .map(|(_, value)| value.into_owned())
        })
        .unwrap_or_else(|| DEFAULT_TARGET_PATH.to_string())
}

/// The body is only forwarded when the caller declared a non-zero Content-Length.
fn forwarded_body(headers: &HeaderMap, body: Bytes) -> Option<Bytes> {
    let declared = headers
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<usize>().ok())
        .unwrap_or(0);

    if declared == 0 || body.is_empty() {
        None
    } else {
        Some(body)
    }
}
