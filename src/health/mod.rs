//! Liveness surface.
//!
//! # Endpoints
//! ```text
//! liveness.rs:
//!     GET /liveness → 200 "OK"
//!
//! rpc.rs:
//!     POST /{service}/Liveness (Connect, JSON) → {"status":"serving"}
//! ```
//!
//! # Design Decisions
//! - Independent of registry contents and downstream health
//! - Stateless: no locks, no shared data
//! - Both paths are reserved; registrations to them are rejected

pub mod liveness;
pub mod rpc;

pub use liveness::LIVENESS_PATH;
