//! Persistence (ambient shell only, §6 lists no persistence interface).
//!
//! Used by the server binary to cache responses by `(url, scope, format)`
//! key. Deliberately the smallest real thing that demonstrates the TTL
//! contract — no external KV crate, since the spec calls persistence
//! optional and out of scope for the core.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use crate::scope::ExtractionResult;

/// Caches `ExtractionResult`s by an opaque string key, with per-entry TTL.
pub trait ResultStore {
    /// Stores `value` under `key`, expiring after `ttl`.
    fn put(&self, key: &str, value: &ExtractionResult, ttl: Duration);
    /// Returns the cached value for `key`, if present and not expired.
    fn get(&self, key: &str) -> Option<ExtractionResult>;
}

struct Entry {
    value: ExtractionResult,
    expires_at: Instant,
}

/// An in-process `ResultStore`. Entries are not proactively evicted; a
/// `get` past its TTL simply reports a miss and drops the stale entry.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, Entry>>,
}

impl MemoryStore {
    /// An empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl ResultStore for MemoryStore {
    fn put(&self, key: &str, value: &ExtractionResult, ttl: Duration) {
        let mut entries = self.entries.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        entries.insert(
            key.to_string(),
            Entry {
                value: value.clone(),
                expires_at: Instant::now() + ttl,
            },
        );
    }

    fn get(&self, key: &str) -> Option<ExtractionResult> {
        let mut entries = self.entries.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        match entries.get(key) {
            Some(entry) if entry.expires_at > Instant::now() => Some(entry.value.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }
}
