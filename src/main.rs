//! Appwrite CORS proxy.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request      ┌──────────┐   ┌──────────────┐   ┌──────────────┐
//!     ───────────────────▶│   net    │──▶│ http server  │──▶│   request    │
//!                         │ listener │   │  + CORS      │   │  translator  │
//!                         └──────────┘   └──────────────┘   └──────┬───────┘
//!                                                                  │
//!                                                                  ▼
//!     Client Response     ┌──────────┐                      ┌──────────────┐
//!     ◀───────────────────│ response │◀─────────────────────│   upstream   │◀──── Upstream
//!                         │  relay   │                      │  connector   │
//!                         └──────────┘                      └──────────────┘
//! ```

use clap::Parser;

use appwrite_proxy::cli::Cli;
use appwrite_proxy::config::{finalize_config, load_config};
use appwrite_proxy::lifecycle::startup;
use appwrite_proxy::observability::logging;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = load_config(cli.config.as_deref())?;
    cli.apply(&mut config);
    let config = finalize_config(config)?;

    logging::init_logging(&config.observability.log_level);

    tracing::debug!(
        port = config.listener.port,
        target = %config.upstream.target,
        connect_timeout_secs = ?config.timeouts.connect_secs,
        request_timeout_secs = ?config.timeouts.request_secs,
        "Configuration loaded"
    );

    startup::run(config).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
