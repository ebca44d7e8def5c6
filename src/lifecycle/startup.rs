//! Startup orchestration.
//!
//! # Responsibilities
//! - Initialize subsystems in dependency order (metrics, server, listener)
//! - Announce the bound port and upstream target
//! - Serve until a stop signal arrives
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - The listener binds last (traffic only when ready)

use std::net::SocketAddr;
use thiserror::Error;

use crate::config::ProxyConfig;
use crate::http::{HttpServer, ServerError};
use crate::lifecycle::{signals, Shutdown};
use crate::net::{self, ListenerError};
use crate::observability::metrics;

/// Anything that stops the proxy from coming up or keeps it from serving.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Server(#[from] ServerError),

    #[error(transparent)]
    Listener(#[from] ListenerError),

    #[error("metrics exporter failed: {0}")]
    Metrics(String),

    #[error("server error: {0}")]
    Serve(#[from] std::io::Error),
}

/// Bring the proxy up and serve until SIGINT/SIGTERM.
pub async fn run(config: ProxyConfig) -> Result<(), StartupError> {
    if let Some(addr) = &config.observability.metrics_address {
        let addr: SocketAddr = addr
            .parse()
            .map_err(|e: std::net::AddrParseError| StartupError::Metrics(e.to_string()))?;
        metrics::init_metrics(addr).map_err(|e| StartupError::Metrics(e.to_string()))?;
    }

    let server = HttpServer::new(config)?;
    let listener = net::bind(&server.config().listener).await?;

    // Port 0 binds an ephemeral port; announce the real one.
    let port = listener.local_addr()?.port();
    let target = server.config().upstream.target.clone();
    tracing::info!(port, target = %target, "Proxy forwarding to {} on port {}", target, port);

    let shutdown = Shutdown::new();
    signals::spawn_signal_listener(shutdown.clone());

    server.run(listener, shutdown.subscribe()).await?;
    Ok(())
}
