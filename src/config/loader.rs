//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;

use crate::config::schema::ProxyConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable overriding the proxy listener address.
pub const PROXY_PORT_ENV: &str = "PORT";
/// Environment variable overriding the admin listener address.
pub const ADMIN_PORT_ENV: &str = "ADMIN_PORT";

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
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

/// Load configuration: defaults, then the optional TOML file, then the
/// process environment. The result is validated.
pub fn load_config(path: Option<&Path>) -> Result<ProxyConfig, ConfigError> {
    let mut config = match path {
        Some(path) => {
            let content = fs::read_to_string(path)?;
            toml::from_str(&content)?
        }
        None => ProxyConfig::default(),
    };

    apply_env(&mut config, |key| std::env::var(key).ok());
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Apply `PORT` / `ADMIN_PORT` overrides using `lookup` to read variables.
pub fn apply_env<F>(config: &mut ProxyConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(port) = lookup(PROXY_PORT_ENV).filter(|v| !v.is_empty()) {
        config.listener.bind_address = resolve_bind_address(&port);
    }
    if let Some(port) = lookup(ADMIN_PORT_ENV).filter(|v| !v.is_empty()) {
        config.admin.bind_address = resolve_bind_address(&port);
    }
}

/// Turn a port or `host:port` value into a bindable address.
///
/// A bare port binds all interfaces; so does a value with an empty host.
pub fn resolve_bind_address(value: &str) -> String {
    if !value.contains(':') {
        format!("0.0.0.0:{value}")
    } else if value.starts_with(':') {
        format!("0.0.0.0{value}")
    } else {
        value.to_string()
    }
}
