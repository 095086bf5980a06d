//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check the upstream base URL is a usable http(s) origin
//! - Validate value ranges (timeout and header budget > 0, bindable listener address)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - A missing bearer secret is deliberately not an error here

use std::net::SocketAddr;

use axum::http::HeaderValue;
use url::Url;

use crate::config::schema::GatewayConfig;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("upstream.base_url '{0}' is not a valid URL")]
    InvalidUpstreamUrl(String),

    #[error("upstream.base_url '{0}' must use http or https")]
    UnsupportedScheme(String),

    #[error("upstream.base_url '{0}' must not carry a query or fragment")]
    UpstreamHasQuery(String),

    #[error("upstream.user_agent is not a valid header value")]
    InvalidUserAgent,

    #[error("upstream.timeout_ms must be greater than zero")]
    ZeroUpstreamTimeout,

    #[error("limits.max_header_bytes must be greater than zero")]
    ZeroHeaderBudget,

    #[error("listener address '{0}' is not a valid socket address")]
    InvalidListenerAddress(String),
}

pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let base = &config.upstream.base_url;
    match Url::parse(base) {
        Ok(url) => {
            if !matches!(url.scheme(), "http" | "https") {
                errors.push(ValidationError::UnsupportedScheme(base.clone()));
            }
            if url.query().is_some() || url.fragment().is_some() {
                errors.push(ValidationError::UpstreamHasQuery(base.clone()));
            }
        }
        Err(_) => errors.push(ValidationError::InvalidUpstreamUrl(base.clone())),
    }

    if HeaderValue::from_str(&config.upstream.user_agent).is_err() {
        errors.push(ValidationError::InvalidUserAgent);
    }

    if config.upstream.timeout_ms == 0 {
        errors.push(ValidationError::ZeroUpstreamTimeout);
    }

    if config.limits.max_header_bytes == 0 {
        errors.push(ValidationError::ZeroHeaderBudget);
    }

    let bind = config.listener.bind_address();
    if bind.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidListenerAddress(bind));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
