//! Configuration loading from disk.

use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::config::schema::ProxyConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load configuration from a TOML file, or the defaults when no file is given.
///
/// The result is not validated yet: command-line and environment overrides
/// are applied on top before [`finalize_config`] runs.
pub fn load_config(path: Option<&Path>) -> Result<ProxyConfig, ConfigError> {
    match path {
        Some(path) => {
            let content = fs::read_to_string(path)?;
            Ok(toml::from_str(&content)?)
        }
        None => Ok(ProxyConfig::default()),
    }
}

/// Validate a fully assembled configuration.
pub fn finalize_config(config: ProxyConfig) -> Result<ProxyConfig, ConfigError> {
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_temp(content: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("appwrite-proxy-{}.toml", uuid::Uuid::new_v4()));
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_load_from_file() {
        let path = write_temp(
            r#"
            [listener]
            port = 9100

            [upstream]
            target = "http://appwrite:80"
            "#,
        );

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.listener.port, 9100);
        assert_eq!(config.upstream.target, "http://appwrite:80");

        fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let path = std::env::temp_dir().join("appwrite-proxy-does-not-exist.toml");
        assert!(matches!(load_config(Some(&path)), Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_bad_toml_is_parse_error() {
        let path = write_temp("[listener\nport = ");
        assert!(matches!(load_config(Some(&path)), Err(ConfigError::Parse(_))));
        fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_finalize_rejects_invalid() {
        let mut config = ProxyConfig::default();
        config.upstream.target = "localhost".into();

        let err = finalize_config(config).unwrap_err();
        assert!(err.to_string().starts_with("Validation failed: upstream.target"));
    }
}
