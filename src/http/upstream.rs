//! Upstream connector.
//!
//! # Responsibilities
//! - Parse the configured upstream base URL (scheme, host, port)
//! - Issue exactly one request per inbound request
//! - Wait for the complete upstream response
//! - Translate transport failures into [`UpstreamError`]
//!
//! # Design Decisions
//! - No connection reuse: the client keeps no idle connections, so every
//!   exchange opens its own connection and drops it when the response is read
//! - Redirects are never followed
//! - TLS is picked from the scheme (`https`), defaulting to port 443; plain
//!   `http` defaults to port 80
//! - The request target is sent byte-for-byte as the path-and-query of a URI
//!   whose scheme and authority come only from the configuration
//! - The request timeout, when set, covers the whole exchange including the body

use axum::body::{to_bytes, Body, Bytes};
use axum::http::uri::{Authority, PathAndQuery, Scheme};
use axum::http::{header, HeaderValue, Request, StatusCode, Uri};
use hyper_tls::HttpsConnector;
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;
use url::Url;

use crate::config::TimeoutConfig;
use crate::http::request::{OutboundRequest, DEFAULT_CONTENT_TYPE};

/// Transport used to reach the upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport {
    Plain,
    Tls,
}

impl Transport {
    fn scheme(self) -> Scheme {
        match self {
            Transport::Plain => Scheme::HTTP,
            Transport::Tls => Scheme::HTTPS,
        }
    }

    fn default_port(self) -> u16 {
        match self {
            Transport::Plain => 80,
            Transport::Tls => 443,
        }
    }
}

/// Problems with the configured upstream base URL.
#[derive(Debug, Error)]
pub enum TargetError {
    #[error("not a URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("unsupported scheme {0:?}, expected http or https")]
    Scheme(String),

    #[error("no host given")]
    MissingHost,

    #[error("invalid authority: {0}")]
    Authority(#[from] axum::http::uri::InvalidUri),
}

/// Upstream origin every request is sent to.
///
/// Scheme and authority are fixed at startup; a request only ever supplies
/// the path-and-query part of the URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamTarget {
    transport: Transport,
    authority: Authority,
}

impl UpstreamTarget {
    /// Parse a base URL such as `http://localhost:8080`.
    ///
    /// Any path or query on the base URL is ignored; the request target always
    /// comes from the inbound `path` parameter.
    pub fn parse(base: &str) -> Result<Self, TargetError> {
        let url = Url::parse(base)?;

        let transport = match url.scheme() {
            "http" => Transport::Plain,
            "https" => Transport::Tls,
            other => return Err(TargetError::Scheme(other.to_string())),
        };

        let host = match url.host_str() {
            Some(host) if !host.is_empty() => host,
            _ => return Err(TargetError::MissingHost),
        };

        let port = url.port().unwrap_or_else(|| transport.default_port());
        let authority = Authority::from_str(&format!("{}:{}", host, port))?;

        Ok(Self {
            transport,
            authority,
        })
    }

    pub fn transport(&self) -> Transport {
        self.transport
    }

    pub fn host(&self) -> &str {
        self.authority.host()
    }

    pub fn port(&self) -> u16 {
        self.authority
            .port_u16()
            .unwrap_or_else(|| self.transport.default_port())
    }

    /// Absolute URI for a request target on this upstream.
    ///
    /// The target becomes the path-and-query verbatim: no dot-segment
    /// removal, no leading `/` required, and it can never alter the host.
    pub fn uri_for(&self, target_path: &str) -> Result<Uri, UpstreamError> {
        let invalid = |source| UpstreamError::InvalidTarget {
            target: target_path.to_string(),
            source,
        };

        let path_and_query = PathAndQuery::from_str(target_path).map_err(|e| invalid(e.into()))?;

        Uri::builder()
            .scheme(self.transport.scheme())
            .authority(self.authority.clone())
            .path_and_query(path_and_query)
            .build()
            .map_err(invalid)
    }
}

impl fmt::Display for UpstreamTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}", self.transport.scheme(), self.authority)
    }
}

/// Failure of a single upstream exchange.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("invalid request target {target}: {source}")]
    InvalidTarget {
        target: String,
        source: axum::http::Error,
    },

    #[error("connection failed: {}", chain(.0))]
    Connect(hyper_util::client::legacy::Error),

    #[error("timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    #[error("{}", chain(.0))]
    Transport(hyper_util::client::legacy::Error),

    #[error("failed to read response body: {}", chain(.0))]
    Body(axum::Error),
}

impl UpstreamError {
    /// Short label for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            UpstreamError::InvalidTarget { .. } => "invalid_target",
            UpstreamError::Connect(_) => "connect",
            UpstreamError::Timeout(_) => "timeout",
            UpstreamError::Transport(_) => "transport",
            UpstreamError::Body(_) => "body",
        }
    }

    fn from_send(e: hyper_util::client::legacy::Error) -> Self {
        if e.is_connect() {
            UpstreamError::Connect(e)
        } else {
            UpstreamError::Transport(e)
        }
    }
}

/// Render an error with all of its sources, outermost first.
fn chain(e: &dyn std::error::Error) -> String {
    let mut out = e.to_string();
    let mut source = e.source();
    while let Some(inner) = source {
        let text = inner.to_string();
        if !out.contains(&text) {
            out.push_str(": ");
            out.push_str(&text);
        }
        source = inner.source();
    }
    out
}

/// What the upstream answered.
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub content_type: HeaderValue,
    pub body: Bytes,
}

/// HTTP client bound to a single upstream.
#[derive(Clone)]
pub struct UpstreamClient {
    client: Client<HttpsConnector<HttpConnector>, Body>,
    target: UpstreamTarget,
    request_timeout: Option<Duration>,
}

impl UpstreamClient {
    /// Build a client for `target`, applying the optional timeouts.
    pub fn new(target: UpstreamTarget, timeouts: &TimeoutConfig) -> Self {
        let mut http = HttpConnector::new();
        http.enforce_http(false);
        http.set_connect_timeout(timeouts.connect());

        let client = Client::builder(TokioExecutor::new())
            .pool_max_idle_per_host(0)
            .build(HttpsConnector::new_with_connector(http));

        Self {
            client,
            target,
            request_timeout: timeouts.request(),
        }
    }

    pub fn target(&self) -> &UpstreamTarget {
        &self.target
    }

    /// Perform one request/response exchange with the upstream.
    ///
    /// The connection is released when this returns, on every path.
    pub async fn forward(&self, request: OutboundRequest) -> Result<UpstreamResponse, UpstreamError> {
        tracing::debug!(
            method = %request.method,
            target = %request.target_path,
            upstream = %self.target,
            "Forwarding request"
        );

        match self.request_timeout {
            Some(limit) => tokio::time::timeout(limit, self.exchange(request))
                .await
                .map_err(|_| UpstreamError::Timeout(limit))?,
            None => self.exchange(request).await,
        }
    }

    async fn exchange(&self, request: OutboundRequest) -> Result<UpstreamResponse, UpstreamError> {
        let uri = self.target.uri_for(&request.target_path)?;

        let body = match request.body {
            Some(bytes) => Body::from(bytes),
            None => Body::empty(),
        };
        let mut req = Request::new(body);
        *req.method_mut() = request.method;
        *req.uri_mut() = uri;
        for (name, value) in request.headers.iter() {
            req.headers_mut().insert(name, value.clone());
        }

        let response: hyper::Response<hyper::body::Incoming> =
            self.client.request(req).await.map_err(UpstreamError::from_send)?;

        let (parts, body) = response.into_parts();
        let content_type = parts
            .headers
            .get(header::CONTENT_TYPE)
            .cloned()
            .unwrap_or_else(|| HeaderValue::from_static(DEFAULT_CONTENT_TYPE));
        let body = to_bytes(Body::new(body), usize::MAX)
            .await
            .map_err(UpstreamError::Body)?;

        Ok(UpstreamResponse {
            status: parts.status,
            content_type,
            body,
        })
    }
}
