//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the proxy and preflight handlers
//! - Wire up middleware (CORS, request ID, tracing, body limit)
//! - Serve connections from a bound listener until shutdown
//! - Translate, forward and relay each request

use axum::{
    body::{Body, Bytes},
    extract::{DefaultBodyLimit, State},
    http::{HeaderMap, Method, Request, Uri},
    response::Response,
    routing::{on, MethodFilter, MethodRouter},
    Router,
};
use std::time::Instant;
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::config::ProxyConfig;
use crate::http::request::OutboundRequest;
use crate::http::request_id::{MakeRequestUuidV4, RequestIdExt, X_REQUEST_ID};
use crate::http::response::{error_response, method_not_allowed, preflight, relay};
use crate::http::upstream::{TargetError, UpstreamClient, UpstreamTarget};
use crate::lifecycle::ShutdownSignal;
use crate::observability::metrics;
use crate::security::cors_layer;

/// Errors raised while assembling the server.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("invalid upstream target: {0}")]
    Target(#[from] TargetError),
}

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub upstream: UpstreamClient,
}

/// HTTP server for the proxy.
pub struct HttpServer {
    router: Router,
    config: ProxyConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ProxyConfig) -> Result<Self, ServerError> {
        let target = UpstreamTarget::parse(&config.upstream.target)?;
        let upstream = UpstreamClient::new(target, &config.timeouts);

        let router = Self::build_router(&config, AppState { upstream });
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &ProxyConfig, state: AppState) -> Router {
        let forwarded = MethodFilter::GET
            .or(MethodFilter::POST)
            .or(MethodFilter::PUT)
            .or(MethodFilter::PATCH)
            .or(MethodFilter::DELETE);
        // HEAD would otherwise fall through to the GET route.
        let handlers: MethodRouter<AppState> = on(forwarded, proxy_handler)
            .options(preflight_handler)
            .head(unsupported_handler);

        Router::new()
            .route("/{*path}", handlers.clone())
            .route("/", handlers)
            .with_state(state)
            .layer(DefaultBodyLimit::disable())
            .layer(RequestBodyLimitLayer::new(config.listener.max_body_bytes))
            .layer(PropagateRequestIdLayer::new(X_REQUEST_ID))
            .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = %request.request_id(),
                )
            }))
            .layer(SetRequestIdLayer::new(X_REQUEST_ID, MakeRequestUuidV4))
            .layer(cors_layer())
    }

    /// The fully layered router, for driving the server without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }

    /// Run the server, accepting connections on the given listener until
    /// `shutdown` fires. In-flight requests are allowed to finish.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: ShutdownSignal,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Main proxy handler.
/// Translates the request, forwards it upstream and relays the answer.
async fn proxy_handler(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let start = Instant::now();
    let request = OutboundRequest::from_inbound(method.clone(), &uri, &headers, body);

    let response = match state.upstream.forward(request).await {
        Ok(upstream) => {
            tracing::debug!(
                request_id = %headers.request_id(),
                status = %upstream.status,
                bytes = upstream.body.len(),
                "Relaying upstream response"
            );
            relay(upstream)
        }
        Err(e) => {
            tracing::error!(
                request_id = %headers.request_id(),
                upstream = %state.upstream.target(),
                error = %e,
                "Upstream request failed"
            );
            metrics::record_upstream_error(e.kind());
            error_response(&e)
        }
    };

    metrics::record_request(method.as_str(), response.status().as_u16(), start);
    response
}

/// CORS preflight: answered locally, never forwarded.
async fn preflight_handler() -> Response {
    preflight()
}

/// Methods outside the forwarded set that axum would otherwise route.
async fn unsupported_handler() -> Response {
    method_not_allowed()
}
