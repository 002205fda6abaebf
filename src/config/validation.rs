//! Configuration validation.
//!
//! Semantic checks only; serde already handled syntax. Every problem is
//! collected so an operator sees the whole list in one run.

use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::config::schema::GatewayConfig;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("upstream.base_url '{0}' is not an absolute URL")]
    InvalidBaseUrl(String),

    #[error("upstream.base_url '{0}' must use http or https")]
    UnsupportedScheme(String),

    #[error("upstream.base_url '{0}' cannot carry path segments")]
    OpaqueBaseUrl(String),

    #[error("observability.log_level '{0}' is not one of trace, debug, info, warn, error")]
    UnknownLogLevel(String),

    #[error("observability.metrics_address '{0}' is not a socket address")]
    InvalidMetricsAddress(String),
}

/// Validate a configuration, returning all errors found.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let base = &config.upstream.base_url;
    match Url::parse(base) {
        Ok(url) => {
            if url.scheme() != "http" && url.scheme() != "https" {
                errors.push(ValidationError::UnsupportedScheme(base.clone()));
            } else if url.cannot_be_a_base() {
                errors.push(ValidationError::OpaqueBaseUrl(base.clone()));
            }
        }
        Err(_) => errors.push(ValidationError::InvalidBaseUrl(base.clone())),
    }

    let level = config.observability.log_level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ValidationError::UnknownLogLevel(
            config.observability.log_level.clone(),
        ));
    }

    if config.observability.metrics_enabled
        && config
            .observability
            .metrics_address
            .parse::<SocketAddr>()
            .is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
