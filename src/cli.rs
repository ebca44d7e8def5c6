//! Command-line interface.
//!
//! Flags override environment variables, which override the config file.

use clap::Parser;
use std::path::PathBuf;

use crate::config::ProxyConfig;

#[derive(Debug, Parser)]
#[command(name = "appwrite-proxy")]
#[command(about = "Lightweight CORS proxy that forwards browser requests to Appwrite", long_about = None)]
pub struct Cli {
    /// TOML config file
    #[arg(short, long, env = "APPWRITE_PROXY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Proxy listen port [default: 9000]
    #[arg(short, long, env = "PORT")]
    pub port: Option<u16>,

    /// Appwrite endpoint base, e.g. http://localhost:8080 [default: http://localhost:8080]
    #[arg(short, long, env = "APPWRITE_TARGET")]
    pub target: Option<String>,

    /// Upstream connect timeout in seconds [default: none]
    #[arg(long, value_name = "SECS")]
    pub connect_timeout: Option<u64>,

    /// Upstream request timeout in seconds [default: none]
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Serve Prometheus metrics on this address, e.g. 0.0.0.0:9090
    #[arg(long)]
    pub metrics_address: Option<String>,
}

impl Cli {
    /// Layer the given flags over a loaded configuration.
    pub fn apply(&self, config: &mut ProxyConfig) {
        if let Some(port) = self.port {
            config.listener.port = port;
        }
        if let Some(target) = &self.target {
            config.upstream.target = target.clone();
        }
        if let Some(secs) = self.connect_timeout {
            config.timeouts.connect_secs = Some(secs);
        }
        if let Some(secs) = self.timeout {
            config.timeouts.request_secs = Some(secs);
        }
        if let Some(level) = &self.log_level {
            config.observability.log_level = level.clone();
        }
        if let Some(addr) = &self.metrics_address {
            config.observability.metrics_address = Some(addr.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_flags_override_config() {
        let cli = Cli::try_parse_from([
            "appwrite-proxy",
            "--port",
            "9100",
            "--target",
            "https://cloud.example.io",
            "--timeout",
            "30",
        ])
        .unwrap();

        let mut config = ProxyConfig::default();
        config.timeouts.connect_secs = Some(5);
        cli.apply(&mut config);

        assert_eq!(config.listener.port, 9100);
        assert_eq!(config.upstream.target, "https://cloud.example.io");
        assert_eq!(config.timeouts.request_secs, Some(30));
        assert_eq!(config.timeouts.connect_secs, Some(5));
    }

    #[test]
    fn test_rejects_non_numeric_port() {
        assert!(Cli::try_parse_from(["appwrite-proxy", "--port", "http"]).is_err());
    }
}
