//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check that resolved endpoint URLs are usable
//! - Validate value ranges (timeouts > 0, intervals > 0, connect < request)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ManagerConfig → Result<(), Vec<ValidationError>>

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::ManagerConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field}: invalid URL '{url}' ({reason})")]
    InvalidUrl {
        field: &'static str,
        url: String,
        reason: String,
    },

    #[error("{field}: unsupported URL scheme '{scheme}'")]
    UnsupportedScheme { field: &'static str, scheme: String },

    #[error("primary and fallback point at the same endpoint '{0}'")]
    SameEndpoint(String),

    #[error("{0} must be greater than zero")]
    Zero(&'static str),

    #[error("rpc.connect_timeout_secs ({connect}) must be below rpc.timeout_secs ({request})")]
    ConnectTimeout { connect: u64, request: u64 },

    #[error("invalid metrics address '{0}'")]
    MetricsAddress(String),
}

fn check_url(field: &'static str, raw: &str, errors: &mut Vec<ValidationError>) {
    match url::Url::parse(raw) {
        Ok(url) => {
            if !matches!(url.scheme(), "http" | "https" | "ws" | "wss") {
                errors.push(ValidationError::UnsupportedScheme {
                    field,
                    scheme: url.scheme().to_string(),
                });
            }
        }
        Err(e) => errors.push(ValidationError::InvalidUrl {
            field,
            url: raw.to_string(),
            reason: e.to_string(),
        }),
    }
}

/// Check a parsed configuration, collecting every problem found.
pub fn validate_config(config: &ManagerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let primary = config.primary.resolve_url();
    check_url("primary", &primary, &mut errors);

    if let Some(fallback) = config.fallback_url() {
        check_url("fallback", &fallback, &mut errors);
        if fallback == primary {
            errors.push(ValidationError::SameEndpoint(fallback));
        }
    }

    if config.health.staleness_threshold_secs == 0 {
        errors.push(ValidationError::Zero("health.staleness_threshold_secs"));
    }
    if config.health.refresh_interval_secs == 0 {
        errors.push(ValidationError::Zero("health.refresh_interval_secs"));
    }
    if config.rpc.timeout_secs == 0 {
        errors.push(ValidationError::Zero("rpc.timeout_secs"));
    }
    if config.rpc.connect_timeout_secs == 0 {
        errors.push(ValidationError::Zero("rpc.connect_timeout_secs"));
    } else if config.rpc.timeout_secs > 0
        && config.rpc.connect_timeout_secs >= config.rpc.timeout_secs
    {
        errors.push(ValidationError::ConnectTimeout {
            connect: config.rpc.connect_timeout_secs,
            request: config.rpc.timeout_secs,
        });
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::MetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
