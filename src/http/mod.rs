//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (protocol detection: HTTP/1.1 or h2c preface)
//!     → middleware (request ID, trace span, timeout)
//!     → liveness routes, or registry dispatch
//!     → Send to client
//! ```

pub mod server;

pub use server::HttpServer;
