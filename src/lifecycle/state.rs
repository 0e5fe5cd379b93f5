//! Host lifecycle states.
//!
//! # State Transitions
//! ```text
//! Idle → Listening:          first successful listen() (at most once)
//! Listening → ShuttingDown:  shutdown signal observed
//! ShuttingDown → Stopped:    drain complete
//! Idle → Stopped:            stop() before listen()
//! ```

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleState {
    /// Constructed, not yet bound.
    Idle,
    /// Socket bound and accepting connections.
    Listening,
    /// No longer accepting; in-flight requests are draining.
    ShuttingDown,
    /// Socket released.
    Stopped,
}

impl LifecycleState {
    pub fn as_str(&self) -> &'static str {
        match self {
            LifecycleState::Idle => "idle",
            LifecycleState::Listening => "listening",
            LifecycleState::ShuttingDown => "shutting_down",
            LifecycleState::Stopped => "stopped",
        }
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
