//! Concurrent wrapper shared by all worker threads
//!
//! A readers-writer lock guards the pair of indices and a separate mutex
//! serializes sweeper passes. The sweep is itself a mutation, so it must be
//! serialized; keeping it behind its own lock lets the common read case
//! (many readers, nothing due) stay on the read side of the state lock.
//! Lock order is sweep mutex first, state lock second, everywhere.

use parking_lot::{Mutex, RwLock};
use tracing::debug;

use crate::cache::entry::Deadline;
use crate::cache::key_cache::KeyCache;
use crate::clock;
use crate::config::CacheConfig;
use crate::pattern::KeyMatcher;

/// Thread-safe keyspace cache.
///
/// A process-wide handle (typically `Arc<ConcurrentKeyCache>`) passed to the
/// engine's command dispatcher. Write paths invoke the matching mutator
/// after the engine write succeeds; `KEYS` calls [`keys`](Self::keys).
///
/// Readers see a consistent snapshot of the presence map taken at read-lock
/// acquisition; a reader never observes an expired key.
pub struct ConcurrentKeyCache {
    state: RwLock<KeyCache>,
    /// Serializes sweeper passes; always acquired before `state`.
    sweep_lock: Mutex<()>,
}

impl ConcurrentKeyCache {
    pub fn new() -> Self {
        Self::with_config(&CacheConfig::default())
    }

    pub fn with_config(config: &CacheConfig) -> Self {
        Self {
            state: RwLock::new(KeyCache::with_config(config)),
            sweep_lock: Mutex::new(()),
        }
    }

    /// Ensure `key` is present with no expiry.
    pub fn insert(&self, key: &[u8]) {
        let _sweep = self.sweep_lock.lock();
        self.state.write().insert(key);
    }

    /// Ensure `key` is present; if absent, insert with the given absolute
    /// deadline (negative means no expiry). An existing key keeps its
    /// deadline.
    pub fn insert_with_deadline(&self, key: &[u8], deadline: Deadline) {
        let _sweep = self.sweep_lock.lock();
        self.state.write().insert_with_deadline(key, deadline);
    }

    /// Remove `key`. Returns whether it was present.
    pub fn remove(&self, key: &[u8]) -> bool {
        let _sweep = self.sweep_lock.lock();
        self.state.write().remove(key)
    }

    /// Replace the deadline of a present key (negative means no expiry).
    /// Returns whether the key was present.
    pub fn expire(&self, key: &[u8], deadline: Deadline) -> bool {
        let _sweep = self.sweep_lock.lock();
        self.state.write().expire(key, deadline)
    }

    /// Return every live key matching `pattern`, in no particular order.
    pub fn keys(&self, pattern: &[u8]) -> Vec<Vec<u8>> {
        self.drain_expired();
        let matcher = KeyMatcher::compile(pattern);
        self.state.read().scan(&matcher)
    }

    /// Number of live keys.
    pub fn len(&self) -> usize {
        self.drain_expired();
        self.state.read().cardinality()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether `key` is live.
    pub fn contains(&self, key: &[u8]) -> bool {
        self.drain_expired();
        self.state.read().peek(key).is_some()
    }

    /// Current deadline of a live key.
    pub fn deadline(&self, key: &[u8]) -> Option<Deadline> {
        self.drain_expired();
        self.state.read().peek(key)
    }

    /// Clear both indices.
    pub fn clear(&self) {
        let _sweep = self.sweep_lock.lock();
        self.state.write().clear();
    }

    /// Run one sweeper pass and return the number of entries dropped.
    pub fn evict_expired(&self) -> usize {
        let _sweep = self.sweep_lock.lock();
        let now = clock::epoch_millis();
        self.state.write().evict_expired_at(now)
    }

    /// Entries dropped by the sweeper over the cache's lifetime.
    pub fn expired_total(&self) -> u64 {
        self.state.read().expired_count()
    }

    /// Sweep on the read path.
    ///
    /// The earliest deadline is checked under the read guard first and the
    /// write guard is taken only when something is actually due, so idle
    /// read traffic never contends on the state lock's write side.
    fn drain_expired(&self) {
        let _sweep = self.sweep_lock.lock();
        let now = clock::epoch_millis();
        let due = {
            let state = self.state.read();
            state.next_deadline().is_some_and(|deadline| deadline <= now)
        };
        if due {
            let evicted = self.state.write().evict_expired_at(now);
            if evicted > 0 {
                debug!(evicted, "sweeper dropped expired keys");
            }
        }
    }
}

impl Default for ConcurrentKeyCache {
    fn default() -> Self {
        Self::new()
    }
}
