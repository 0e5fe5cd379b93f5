//! Shutdown coordination for the host.

use std::sync::Arc;

use tokio::sync::watch;

/// Single-fire, multi-observer shutdown signal.
///
/// Firing is idempotent. Every waiter, including ones that start waiting
/// after the signal fired, completes exactly once.
#[derive(Debug, Clone)]
pub struct Shutdown {
    tx: Arc<watch::Sender<bool>>,
}

impl Shutdown {
    /// Create a new shutdown coordinator.
    pub fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    /// Fire the signal. Returns true only for the call that fired it.
    pub fn trigger(&self) -> bool {
        self.tx.send_if_modified(|fired| {
            if *fired {
                false
            } else {
                *fired = true;
                true
            }
        })
    }

    pub fn is_triggered(&self) -> bool {
        *self.tx.borrow()
    }

    /// Wait until the signal fires.
    pub async fn wait(&self) {
        let mut rx = self.tx.subscribe();
        // The sender lives as long as `self`, so this only returns once fired.
        let _ = rx.wait_for(|fired| *fired).await;
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
