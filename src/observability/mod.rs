//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → tracing events with key-value fields
//!     → logging.rs subscriber (pretty or JSON, env-filtered)
//!
//! Per-request spans and x-request-id come from the HTTP middleware stack.
//! ```
//!
//! # Design Decisions
//! - Structured logging (JSON) for machine parsing
//! - Request ID flows through every request span
//! - A logging failure never stops the host

pub mod logging;

pub use logging::init_logging;
