//! Composable network service host.
//!
//! Independent services register `(pattern, handler)` pairs; the host serves
//! them over one listener speaking HTTP/1.1 and HTTP/2 (including h2c), keeps
//! a liveness surface of its own, and shuts down by draining in-flight work.

pub mod config;
pub mod error;
pub mod health;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod observability;
pub mod routing;
pub mod service;
pub mod services;

pub use config::HostConfig;
pub use error::{HostError, RegistryError};
pub use lifecycle::{Host, LifecycleState, Shutdown};
pub use service::{Handler, Service};
