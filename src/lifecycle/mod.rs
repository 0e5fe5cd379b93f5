//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (host.rs):
//!     Register services → listen(addr) → bind → spawn HTTP server → wait
//!
//! Shutdown (shutdown.rs):
//!     stop() → signal fires once → stop accepting → drain → Stopped
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → stop()
//! ```
//!
//! # Design Decisions
//! - Single start: the socket is bound at most once per host
//! - Ordered shutdown: stop accept, drain, close
//! - Drain deadline is optional; unset waits for every in-flight request
//! - The lifecycle never touches the registry's writer lock

pub mod host;
pub mod shutdown;
pub mod signals;
pub mod state;

pub use host::Host;
pub use shutdown::Shutdown;
pub use state::LifecycleState;
