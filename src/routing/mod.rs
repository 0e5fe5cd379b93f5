//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Registration (startup, any thread):
//!     (pattern, handler)
//!     → matcher.rs (validate pattern)
//!     → registry.rs (exclusive writer)
//!     → router.rs (new immutable RouteTable)
//!     → atomic publish of Arc<RouteTable>
//!
//! Dispatch (every request):
//!     request path
//!     → registry.rs (load current snapshot, no lock)
//!     → router.rs (longest-pattern lookup)
//!     → Return: Found / Redirect / NotFound
//! ```
//!
//! # Design Decisions
//! - Snapshots are immutable; registration builds a new one and swaps it in
//! - Duplicate patterns fail loud at registration time
//! - Deterministic: same input always matches same route

pub mod matcher;
pub mod registry;
pub mod router;

pub use matcher::Pattern;
pub use registry::Registry;
pub use router::{Lookup, Route, RouteTable};
