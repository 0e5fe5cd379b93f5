//! Route table lookup.
//!
//! # Responsibilities
//! - Store registered routes in registration order
//! - Look up the handler for a request path
//! - Return matched route, redirect, or explicit no-match
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - Longest matching pattern wins, regardless of registration order
//! - O(n) scan (acceptable for typical service counts)

use crate::error::RegistryError;
use crate::routing::matcher::{Pattern, PatternKind};
use crate::service::Handler;

/// A registered pattern and its handler.
#[derive(Debug, Clone)]
pub struct Route {
    pub pattern: Pattern,
    pub handler: Handler,
}

/// Result of a route lookup.
#[derive(Debug)]
pub enum Lookup<'a> {
    /// A pattern matched.
    Found(&'a Route),
    /// Only the subtree form of the path is registered; redirect to it.
    Redirect(String),
    /// Nothing matched.
    NotFound,
}

/// An immutable snapshot of all registered routes.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a new table containing every existing route plus `route`.
    ///
    /// Fails if the pattern is already present; `self` is never modified.
    pub fn with_route(&self, route: Route) -> Result<Self, RegistryError> {
        if self.contains(&route.pattern) {
            return Err(RegistryError::DuplicatePattern {
                pattern: route.pattern.as_str().to_string(),
            });
        }

        let mut routes = Vec::with_capacity(self.routes.len() + 1);
        routes.extend(self.routes.iter().cloned());
        routes.push(route);
        Ok(Self { routes })
    }

    pub fn contains(&self, pattern: &Pattern) -> bool {
        self.routes.iter().any(|r| &r.pattern == pattern)
    }

    /// Find the route for a request path.
    pub fn lookup(&self, path: &str) -> Lookup<'_> {
        let best = self
            .routes
            .iter()
            .filter(|r| r.pattern.matches(path))
            .max_by_key(|r| r.pattern.specificity());

        if let Some(route) = best {
            return Lookup::Found(route);
        }

        if !path.ends_with('/') {
            let with_slash = format!("{}/", path);
            let has_subtree = self.routes.iter().any(|r| {
                r.pattern.kind() == PatternKind::Subtree && r.pattern.as_str() == with_slash
            });
            if has_subtree {
                return Lookup::Redirect(with_slash);
            }
        }

        Lookup::NotFound
    }

    /// Patterns in registration order.
    pub fn patterns(&self) -> impl Iterator<Item = &Pattern> {
        self.routes.iter().map(|r| &r.pattern)
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
