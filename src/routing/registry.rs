//! Handler registry.
//!
//! Registration goes through a private mutex so concurrent initializers never
//! interleave. Each registration publishes a fresh [`RouteTable`] snapshot;
//! dispatch loads the current snapshot without taking any lock.

use std::sync::{Arc, Mutex, PoisonError};

use arc_swap::ArcSwap;

use crate::error::RegistryError;
use crate::routing::matcher::Pattern;
use crate::routing::router::{Route, RouteTable};
use crate::service::Handler;

/// Mapping from URL pattern to handler.
#[derive(Debug)]
pub struct Registry {
    /// Serializes writers. Never held across an await.
    writer: Mutex<()>,
    table: ArcSwap<RouteTable>,
    reserved: Vec<String>,
}

impl Registry {
    pub fn new() -> Self {
        Self::with_reserved(Vec::<String>::new())
    }

    /// Create a registry that refuses the given paths.
    pub fn with_reserved<I, P>(reserved: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<String>,
    {
        Self {
            writer: Mutex::new(()),
            table: ArcSwap::from_pointee(RouteTable::new()),
            reserved: reserved.into_iter().map(Into::into).collect(),
        }
    }

    /// Register `handler` under `pattern`.
    ///
    /// Duplicate, reserved, and malformed patterns are rejected immediately and
    /// leave the registry unchanged.
    pub fn register(&self, pattern: &str, handler: Handler) -> Result<(), RegistryError> {
        let pattern = Pattern::parse(pattern)?;
        if self.is_reserved(pattern.as_str()) {
            return Err(RegistryError::ReservedPattern {
                pattern: pattern.to_string(),
            });
        }

        let _guard = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        let next = self.table.load().with_route(Route {
            pattern: pattern.clone(),
            handler,
        })?;
        self.table.store(Arc::new(next));

        tracing::info!(pattern = %pattern, "Handler registered");
        Ok(())
    }

    /// Current routing snapshot.
    pub fn snapshot(&self) -> Arc<RouteTable> {
        self.table.load_full()
    }

    /// Registered patterns in registration order.
    pub fn patterns(&self) -> Vec<String> {
        self.table
            .load()
            .patterns()
            .map(|p| p.as_str().to_string())
            .collect()
    }

    /// Returns true if `path` belongs to the host and cannot be registered.
    pub fn is_reserved(&self, path: &str) -> bool {
        self.reserved.iter().any(|r| r == path)
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::router::Lookup;

    fn handler() -> Handler {
        Handler::from_handler(|| async { "ok" })
    }

    #[test]
    fn register_and_lookup() {
        let registry = Registry::new();
        registry.register("/v1/echo", handler()).unwrap();

        let snapshot = registry.snapshot();
        assert!(matches!(snapshot.lookup("/v1/echo"), Lookup::Found(_)));
        assert!(matches!(snapshot.lookup("/v2/echo"), Lookup::NotFound));
    }

    #[test]
    fn duplicate_fails_loud() {
        let registry = Registry::new();
        registry.register("/v1/echo", handler()).unwrap();

        let err = registry.register("/v1/echo", handler()).unwrap_err();
        assert!(matches!(err, RegistryError::DuplicatePattern { .. }));
        assert_eq!(registry.patterns(), vec!["/v1/echo"]);
    }

    #[test]
    fn reserved_paths_rejected() {
        let registry = Registry::with_reserved(["/liveness"]);

        let err = registry.register("/liveness", handler()).unwrap_err();
        assert_eq!(
            err,
            RegistryError::ReservedPattern {
                pattern: "/liveness".to_string()
            }
        );
        assert!(registry.patterns().is_empty());
        assert!(registry.is_reserved("/liveness"));
    }

    #[test]
    fn malformed_pattern_fails_at_registration() {
        let registry = Registry::new();
        assert!(registry.register("no-slash", handler()).is_err());
        assert!(registry.register("", handler()).is_err());
        assert!(registry.patterns().is_empty());
    }

    #[test]
    fn old_snapshot_unaffected_by_later_registration() {
        let registry = Registry::new();
        registry.register("/a", handler()).unwrap();
        let before = registry.snapshot();

        registry.register("/b", handler()).unwrap();

        assert_eq!(before.len(), 1);
        assert_eq!(registry.snapshot().len(), 2);
    }

    #[test]
    fn concurrent_registration() {
        let registry = Registry::new();

        std::thread::scope(|scope| {
            for t in 0..8 {
                let registry = &registry;
                scope.spawn(move || {
                    for i in 0..25 {
                        registry
                            .register(&format!("/svc-{}/{}", t, i), handler())
                            .unwrap();
                    }
                });
            }
        });

        let patterns = registry.patterns();
        assert_eq!(patterns.len(), 200);

        let snapshot = registry.snapshot();
        for t in 0..8 {
            for i in 0..25 {
                let path = format!("/svc-{}/{}", t, i);
                match snapshot.lookup(&path) {
                    Lookup::Found(route) => assert_eq!(route.pattern.as_str(), path),
                    other => panic!("{} not found: {:?}", path, other),
                }
            }
        }
    }

    #[test]
    fn concurrent_duplicates_exactly_one_wins() {
        let registry = Registry::new();
        let wins = std::sync::atomic::AtomicUsize::new(0);

        std::thread::scope(|scope| {
            for _ in 0..8 {
                scope.spawn(|| {
                    if registry.register("/contended", handler()).is_ok() {
                        wins.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
                    }
                });
            }
        });

        assert_eq!(wins.load(std::sync::atomic::Ordering::SeqCst), 1);
        assert_eq!(registry.patterns(), vec!["/contended"]);
    }
}
