//! In-Memory Cache with Per-Entry Expiry
//!
//! ## Overview
//!
//! A tiny key/value store for the handful of long-lived values the gateway
//! keeps between polls: the editable-limits table and optimistic parameter
//! values written through `set_param`.
//!
//! ## Expiry Model
//!
//! Every entry carries an absolute expiry timestamp computed at `set` time.
//! There is no sweeper: an expired entry simply reads as absent and stays in
//! memory until the key is overwritten.
//!
//! ```text
//! set("k", v, 60s) at t=0      get("k") at t=59s  -> Some(v)
//!                              get("k") at t=60s  -> None
//! ```
//!
//! `get` does not distinguish "never set" from "expired". Both are `None`.
//!
//! ## Concurrency
//!
//! Mutation takes `&mut self`. Callers that share a cache between tasks wrap
//! it in a `Mutex`, as the gateway does.
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use std::time::Duration;
//! use econet_core::cache::MemCache;
//! use econet_core::time::MockTimeSource;
//!
//! let clock = MockTimeSource::new(0);
//! let mut cache = MemCache::with_clock(Arc::new(clock.clone()));
//!
//! cache.set_with_ttl("tempCOSet", 55, Duration::from_secs(1));
//! assert_eq!(cache.get("tempCOSet"), Some(&55));
//!
//! clock.advance_secs(1);
//! assert!(!cache.exists("tempCOSet"));
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use log::debug;

use crate::time::{SystemTime, TimeSource, Timestamp};

/// Default entry lifetime when none is given
pub const DEFAULT_TTL: Duration = Duration::from_secs(60);

/// Lifetime for values that never change for a given firmware
pub const NEVER_EXPIRES: Duration = Duration::MAX;

struct CacheEntry<V> {
    value: V,
    expiry: Timestamp,
}

/// Key/value store with lazy per-entry expiry
pub struct MemCache<V> {
    entries: HashMap<String, CacheEntry<V>>,
    clock: Arc<dyn TimeSource>,
}

impl<V> MemCache<V> {
    /// Create an empty cache driven by the system clock
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemTime))
    }

    /// Create an empty cache driven by the given clock
    pub fn with_clock(clock: Arc<dyn TimeSource>) -> Self {
        Self {
            entries: HashMap::new(),
            clock,
        }
    }

    /// Store `value` under `key` for [`DEFAULT_TTL`]
    pub fn set(&mut self, key: impl Into<String>, value: V) {
        self.set_with_ttl(key, value, DEFAULT_TTL);
    }

    /// Store `value` under `key`, replacing any previous entry
    pub fn set_with_ttl(&mut self, key: impl Into<String>, value: V, ttl: Duration) {
        let key = key.into();
        let ttl_ms = u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX);
        let expiry = self.clock.now().saturating_add(ttl_ms);

        debug!("Caching value for: '{}'", key);
        self.entries.insert(key, CacheEntry { value, expiry });
    }

    /// Value for `key` if present and not yet expired
    pub fn get(&self, key: &str) -> Option<&V> {
        let now = self.clock.now();
        match self.entries.get(key) {
            Some(entry) if now < entry.expiry => Some(&entry.value),
            _ => {
                debug!("Cache entry missing for key: '{}'", key);
                None
            }
        }
    }

    /// True iff [`get`](Self::get) would return a value
    pub fn exists(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Number of stored entries, expired ones included
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<V> Default for MemCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> fmt::Debug for MemCache<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let now = self.clock.now();
        let live = self.entries.values().filter(|e| now < e.expiry).count();
        f.debug_struct("MemCache")
            .field("entries", &self.entries.len())
            .field("live", &live)
            .finish()
    }
}
