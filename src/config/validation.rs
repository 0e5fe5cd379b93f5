//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, ports valid)
//! - Reject service paths that collide with the host's reserved paths
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: HostConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::str::FromStr;

use thiserror::Error;
use tracing_subscriber::filter::LevelFilter;

use crate::config::schema::HostConfig;
use crate::health::{rpc::liveness_procedure, LIVENESS_PATH};
use crate::routing::Pattern;

/// A single semantic problem in the configuration.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Check every semantic rule and collect all violations.
pub fn validate_config(config: &HostConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if let Err(message) = check_bind_address(&config.listener.bind_address) {
        errors.push(ValidationError::new("listener.bind_address", message));
    }
    if config.listener.max_connections == 0 {
        errors.push(ValidationError::new(
            "listener.max_connections",
            "must be greater than zero",
        ));
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::new(
            "timeouts.request_secs",
            "must be greater than zero",
        ));
    }
    if config.timeouts.drain_secs == Some(0) {
        errors.push(ValidationError::new(
            "timeouts.drain_secs",
            "must be greater than zero when set",
        ));
    }
    if LevelFilter::from_str(&config.observability.log_level).is_err() {
        errors.push(ValidationError::new(
            "observability.log_level",
            format!("unknown level {:?}", config.observability.log_level),
        ));
    }

    let service = &config.rpc.service;
    if service.is_empty() {
        errors.push(ValidationError::new("rpc.service", "must not be empty"));
    } else if service
        .chars()
        .any(|c| c.is_whitespace() || matches!(c, '/' | ':' | '{' | '}' | '*'))
    {
        errors.push(ValidationError::new(
            "rpc.service",
            format!("invalid service name {:?}", service),
        ));
    }

    if let Some(path) = &config.services.echo_path {
        match Pattern::parse(path.as_str()) {
            Err(e) => errors.push(ValidationError::new("services.echo_path", e.to_string())),
            Ok(pattern) => {
                if pattern.as_str() == LIVENESS_PATH
                    || pattern.as_str() == liveness_procedure(service)
                {
                    errors.push(ValidationError::new(
                        "services.echo_path",
                        format!("{} is reserved by the host", pattern),
                    ));
                }
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_bind_address(address: &str) -> Result<(), String> {
    let (host, port) = address
        .rsplit_once(':')
        .ok_or_else(|| format!("expected host:port, got {:?}", address))?;
    if host.is_empty() {
        return Err(format!("missing host in {:?}", address));
    }
    port.parse::<u16>()
        .map(|_| ())
        .map_err(|_| format!("invalid port in {:?}", address))
}
