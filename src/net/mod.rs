//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming TCP connection
//!     → listener.rs (accept, connection limits)
//!     → Hand off to HTTP layer
//! ```
//!
//! # Design Decisions
//! - Bounded accept prevents resource exhaustion
//! - A connection holds its slot until the HTTP layer is done with it
//! - TLS termination happens outside the host

pub mod listener;

pub use listener::{Listener, ListenerError};
