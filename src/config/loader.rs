//! Configuration loading from disk and the process environment.

use std::fs;
use std::path::Path;

use crate::config::schema::GatewayConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid value for {name}: '{value}'")]
    InvalidEnv { name: &'static str, value: String },

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

/// Build the gateway configuration: defaults, then the optional TOML file,
/// then environment variables, then validation.
pub fn load_config(path: Option<&Path>) -> Result<GatewayConfig, ConfigError> {
    let mut config = match path {
        Some(path) => read_config_file(path)?,
        None => GatewayConfig::default(),
    };

    apply_env_overrides(&mut config, |name| std::env::var(name).ok())?;
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Parse a TOML file into a config. No validation.
pub fn read_config_file(path: &Path) -> Result<GatewayConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Overlay recognised environment variables onto `config`.
///
/// An empty variable counts as unset. `lookup` abstracts the environment so
/// callers (and tests) can supply their own.
pub fn apply_env_overrides<F>(config: &mut GatewayConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

    if let Some(port) = var("PORT") {
        config.listener.port = parse_env("PORT", port)?;
    }

    // An empty token clears one set in the file.
    if let Some(token) = lookup("GATEWAY_BEARER_TOKEN") {
        config.auth.bearer_token = Some(token).filter(|t| !t.is_empty());
    }

    if let Some(ttl) = var("CACHE_TTL_MS") {
        config.cache.ttl_ms = parse_env("CACHE_TTL_MS", ttl)?;
    }

    if let Some(base) = var("UPSTREAM_BASE") {
        config.upstream.base_url = base;
    }

    if let Some(timeout) = var("UPSTREAM_TIMEOUT_MS") {
        config.upstream.timeout_ms = parse_env("UPSTREAM_TIMEOUT_MS", timeout)?;
    }

    if let Some(max) = var("MAX_HEADER_SIZE") {
        config.limits.max_header_bytes = parse_env("MAX_HEADER_SIZE", max)?;
    }

    if let Some(format) = var("LOG_FORMAT") {
        config.observability.log_format = parse_env("LOG_FORMAT", format)?;
    }

    if let Some(addr) = var("METRICS_ADDRESS") {
        config.observability.metrics_enabled = true;
        config.observability.metrics_address = addr;
    }

    Ok(())
}

fn parse_env<T: std::str::FromStr>(name: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidEnv { name, value })
}
