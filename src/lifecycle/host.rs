//! Lifecycle controller.
//!
//! Owns the listening socket's start/stop state machine. `listen` binds once,
//! hands the socket to the HTTP server task, and blocks until `stop` fires;
//! it then waits for the drain and releases the socket.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

use tokio::sync::watch;

use crate::config::validation::validate_config;
use crate::config::{ConfigError, HostConfig};
use crate::error::{HostError, RegistryError};
use crate::health::{rpc::liveness_procedure, LIVENESS_PATH};
use crate::http::HttpServer;
use crate::lifecycle::shutdown::Shutdown;
use crate::lifecycle::state::LifecycleState;
use crate::net::Listener;
use crate::routing::Registry;
use crate::service::{Handler, Service};

/// A process-wide host for HTTP-reachable services.
pub struct Host {
    config: HostConfig,
    registry: Arc<Registry>,
    /// Single-start guard, claimed by the first `listen` call.
    started: AtomicBool,
    state: watch::Sender<LifecycleState>,
    shutdown: Shutdown,
    local_addr: OnceLock<SocketAddr>,
}

impl Host {
    pub fn new(config: HostConfig) -> Self {
        let registry = Registry::with_reserved([
            LIVENESS_PATH.to_string(),
            liveness_procedure(&config.rpc.service),
        ]);
        let (state, _) = watch::channel(LifecycleState::Idle);

        Self {
            config,
            registry: Arc::new(registry),
            started: AtomicBool::new(false),
            state,
            shutdown: Shutdown::new(),
            local_addr: OnceLock::new(),
        }
    }

    /// Register the handler produced by `service`.
    pub fn add_service<S>(&self, service: &S) -> Result<(), RegistryError>
    where
        S: Service + ?Sized,
    {
        let (pattern, handler) = service.create_handler();
        self.registry.register(&pattern, handler)
    }

    /// Register a handler directly.
    pub fn register(&self, pattern: &str, handler: Handler) -> Result<(), RegistryError> {
        self.registry.register(pattern, handler)
    }

    pub fn state(&self) -> LifecycleState {
        *self.state.borrow()
    }

    /// Address the listener is bound to, once bound.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.local_addr.get().copied()
    }

    /// Wait until the host has left `Idle`, then return the bound address.
    ///
    /// Returns `None` if the host was stopped without ever binding.
    pub async fn ready(&self) -> Option<SocketAddr> {
        let mut rx = self.state.subscribe();
        let _ = rx.wait_for(|state| *state != LifecycleState::Idle).await;
        self.local_addr()
    }

    /// Bind `address`, serve until [`Host::stop`] is called, then drain.
    ///
    /// Only the first call binds. Every later call logs and returns `Ok(())`
    /// immediately. An invalid configuration or a bind failure is returned
    /// synchronously and leaves the host `Idle`, so a later call may try
    /// again; if `stop` fired in the meantime the host ends up `Stopped`.
    pub async fn listen(&self, address: &str) -> Result<(), HostError> {
        if self.started.swap(true, Ordering::AcqRel) {
            tracing::info!(address = %address, state = %self.state(), "Already listening");
            return Ok(());
        }
        if self.shutdown.is_triggered() {
            tracing::warn!(address = %address, "Listen requested after stop");
            self.settle_if_stopped();
            return Err(HostError::Stopped);
        }

        if let Err(errors) = validate_config(&self.config) {
            let err = ConfigError::Validation(errors);
            tracing::error!(address = %address, error = %err, "Refusing to listen");
            self.release_start();
            return Err(err.into());
        }
        let server = HttpServer::new(Arc::clone(&self.registry), &self.config);

        let listener = match Listener::bind(address, self.config.listener.max_connections).await {
            Ok(listener) => listener,
            Err(e) => {
                tracing::error!(address = %address, error = %e, "Listen failed");
                self.release_start();
                return Err(e.into());
            }
        };

        let local_addr = listener.local_addr();
        let _ = self.local_addr.set(local_addr);
        self.state.send_replace(LifecycleState::Listening);
        if self.registry.snapshot().is_empty() {
            tracing::warn!(address = %local_addr, "Listening with no registered services");
        }
        tracing::info!(
            address = %local_addr,
            patterns = ?self.registry.patterns(),
            "Listening"
        );

        let serving = tokio::spawn(server.run(listener, self.shutdown.clone()));

        self.shutdown.wait().await;
        self.state.send_replace(LifecycleState::ShuttingDown);
        tracing::info!(address = %local_addr, "Shutting down");

        if let Err(e) = serving.await {
            tracing::error!(error = %e, "HTTP server task failed during shutdown");
        }

        self.state.send_replace(LifecycleState::Stopped);
        tracing::info!(address = %local_addr, "Stopped");
        Ok(())
    }

    /// Give up a start claim that never reached `Listening`.
    fn release_start(&self) {
        self.started.store(false, Ordering::Release);
        self.settle_if_stopped();
    }

    /// `stop` may have fired while this call held the start claim, in which
    /// case it left the state alone. Finish the `Idle → Stopped` move here.
    fn settle_if_stopped(&self) {
        if self.shutdown.is_triggered() {
            self.state.send_if_modified(|state| {
                if *state == LifecycleState::Idle {
                    *state = LifecycleState::Stopped;
                    true
                } else {
                    false
                }
            });
        }
    }

    /// Request shutdown. Safe to call any number of times from any thread.
    pub fn stop(&self) {
        if !self.shutdown.trigger() {
            tracing::debug!("Shutdown already requested");
            return;
        }

        tracing::info!(state = %self.state(), "Shutdown requested");
        let started = self.started.load(Ordering::Acquire);
        self.state.send_if_modified(|state| {
            if !started && *state == LifecycleState::Idle {
                *state = LifecycleState::Stopped;
                true
            } else {
                false
            }
        });
    }
}

impl std::fmt::Debug for Host {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Host")
            .field("state", &self.state())
            .field("local_addr", &self.local_addr())
            .field("patterns", &self.registry.patterns())
            .finish()
    }
}
