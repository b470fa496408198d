//! Time management for cache expiry
//!
//! Provides clock abstraction so expiry logic can run against:
//! - System clock (production)
//! - Mock clock shared between a test and the code under test

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Timestamp in milliseconds since epoch (or an arbitrary origin for mock clocks)
pub type Timestamp = u64;

/// Milliseconds in one second
pub const MS_PER_SECOND: u64 = 1000;

/// Source of time for the system
///
/// Implementations must be shareable between tasks, since the gateway that
/// owns the cache is shared between the polling loop and entity writes.
pub trait TimeSource: Send + Sync {
    /// Get current timestamp in milliseconds
    fn now(&self) -> Timestamp;
}

/// Wall clock time source
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTime;

impl TimeSource for SystemTime {
    fn now(&self) -> Timestamp {
        use std::time::{SystemTime as StdSystemTime, UNIX_EPOCH};

        StdSystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as Timestamp
    }
}

/// Controllable time source for testing
///
/// Clones share the same underlying counter, so a test can keep one handle
/// and hand another to the cache, then advance time from the outside.
#[derive(Debug, Clone, Default)]
pub struct MockTimeSource {
    timestamp: Arc<AtomicU64>,
}

impl MockTimeSource {
    pub fn new(timestamp: Timestamp) -> Self {
        Self {
            timestamp: Arc::new(AtomicU64::new(timestamp)),
        }
    }

    pub fn set(&self, timestamp: Timestamp) {
        self.timestamp.store(timestamp, Ordering::SeqCst);
    }

    pub fn advance(&self, ms: u64) {
        self.timestamp.fetch_add(ms, Ordering::SeqCst);
    }

    pub fn advance_secs(&self, secs: u64) {
        self.advance(secs.saturating_mul(MS_PER_SECOND));
    }
}

impl TimeSource for MockTimeSource {
    fn now(&self) -> Timestamp {
        self.timestamp.load(Ordering::SeqCst)
    }
}
