//! Error types shared across the host.

use thiserror::Error;

use crate::config::ConfigError;
use crate::net::listener::ListenerError;

/// Registration failures. All of them are startup conflicts: they are
/// returned at the moment of registration, never deferred to request time.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("pattern must not be empty")]
    EmptyPattern,

    #[error("invalid pattern {pattern:?}: {reason}")]
    InvalidPattern { pattern: String, reason: &'static str },

    #[error("pattern {pattern:?} is already registered")]
    DuplicatePattern { pattern: String },

    #[error("pattern {pattern:?} is reserved by the host")]
    ReservedPattern { pattern: String },
}

/// Errors surfaced by the lifecycle controller.
#[derive(Debug, Error)]
pub enum HostError {
    #[error(transparent)]
    Listener(#[from] ListenerError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("host has already been stopped")]
    Stopped,
}
