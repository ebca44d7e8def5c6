//! TCP listener setup.
//!
//! # Responsibilities
//! - Bind the configured port on all interfaces
//! - Report bind failures as a typed error so startup can abort

use std::net::{Ipv4Addr, SocketAddr};
use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::ListenerConfig;

/// Error type for listener operations.
#[derive(Debug, Error)]
pub enum ListenerError {
    /// Failed to bind to address.
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        source: std::io::Error,
    },
}

/// Address the proxy listens on: every interface, configured port.
pub fn listen_addr(config: &ListenerConfig) -> SocketAddr {
    SocketAddr::from((Ipv4Addr::UNSPECIFIED, config.port))
}

/// Bind the listening socket.
pub async fn bind(config: &ListenerConfig) -> Result<TcpListener, ListenerError> {
    let addr = listen_addr(config);
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| ListenerError::Bind { addr, source })?;

    tracing::info!(address = %addr, "Listener bound");
    Ok(listener)
}
