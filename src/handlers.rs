//! Handler-lookup collaborator (§6 `lookup_handler`).
//!
//! Modeled as an interface the caller supplies; the core never hardcodes a
//! registry (§9). `Auto` degrades to `Main` and `Handler` fails with
//! `HandlerUnavailable` when no collaborator is given.

use std::collections::HashMap;

use crate::scope::Scope;

/// Resolves a URL (and, for the `Handler` scope, an explicit id) to a
/// concrete `Scope`.
pub trait HandlerLookup {
    /// Looks up a handler. `handler_id` is `Some` only for the `Handler`
    /// scope; `Auto` passes `None` and lets the implementation decide from
    /// `url` alone.
    fn lookup(&self, url: &str, handler_id: Option<&str>) -> Option<Scope>;
}

/// A `HandlerLookup` backed by a static hostname-to-scope table, for
/// callers that just want "site X always uses scope Y" without writing
/// their own collaborator.
#[derive(Debug, Clone, Default)]
pub struct StaticHandlerRegistry {
    by_host: HashMap<String, Scope>,
    by_id: HashMap<String, Scope>,
}

impl StaticHandlerRegistry {
    /// An empty registry; every lookup misses.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a scope to use whenever `url`'s hostname equals `host`.
    #[must_use]
    pub fn with_host(mut self, host: impl Into<String>, scope: Scope) -> Self {
        self.by_host.insert(host.into(), scope);
        self
    }

    /// Registers a scope reachable by an explicit handler id (§6 `Handler`).
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>, scope: Scope) -> Self {
        self.by_id.insert(id.into(), scope);
        self
    }
}

impl HandlerLookup for StaticHandlerRegistry {
    fn lookup(&self, url: &str, handler_id: Option<&str>) -> Option<Scope> {
        if let Some(id) = handler_id {
            return self.by_id.get(id).cloned();
        }
        let host = crate::url_utils::extract_hostname(url)?;
        self.by_host.get(&host).cloned()
    }
}
