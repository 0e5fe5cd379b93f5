//! URL pattern matching.
//!
//! # Responsibilities
//! - Validate patterns at registration time
//! - Match request paths against a single pattern
//!
//! # Design Decisions
//! - A pattern ending in `/` is a subtree pattern: it matches every path
//!   below it. Anything else matches its exact path only.
//! - Matching is case-sensitive and byte-wise
//! - No regex, no wildcards

use std::fmt;

use crate::error::RegistryError;

/// How a pattern matches request paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternKind {
    /// Matches a single path.
    Exact,
    /// Matches the pattern and every path below it.
    Subtree,
}

/// A validated URL pattern.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Pattern {
    raw: String,
}

impl Pattern {
    /// Parse and validate a pattern.
    pub fn parse(raw: impl Into<String>) -> Result<Self, RegistryError> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(RegistryError::EmptyPattern);
        }
        if !raw.starts_with('/') {
            return Err(RegistryError::InvalidPattern {
                pattern: raw,
                reason: "must begin with '/'",
            });
        }
        if raw.chars().any(char::is_whitespace) {
            return Err(RegistryError::InvalidPattern {
                pattern: raw,
                reason: "must not contain whitespace",
            });
        }
        if raw.contains(['?', '#']) {
            return Err(RegistryError::InvalidPattern {
                pattern: raw,
                reason: "must not contain a query or fragment",
            });
        }
        Ok(Self { raw })
    }

    pub fn kind(&self) -> PatternKind {
        if self.raw.ends_with('/') {
            PatternKind::Subtree
        } else {
            PatternKind::Exact
        }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Rank among overlapping matches; the longer pattern is more specific.
    pub fn specificity(&self) -> usize {
        self.raw.len()
    }

    /// Returns true if the request path matches this pattern.
    pub fn matches(&self, path: &str) -> bool {
        match self.kind() {
            PatternKind::Exact => path == self.raw,
            PatternKind::Subtree => path.starts_with(&self.raw),
        }
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
