//! Single-writer keyspace cache core
//!
//! Two indices are kept in lockstep: a presence map from key to its current
//! deadline, and an expiry index ordered by `(deadline, key)`. A key is in
//! one exactly when it is in the other, with the same deadline. Every
//! operation drains expired entries first, so no caller ever observes an
//! expired key and no timer thread is needed.

use std::collections::{BTreeSet, HashMap};

use tracing::trace;

use crate::cache::entry::{normalize_deadline, CacheEntry, Deadline, NEVER};
use crate::clock;
use crate::config::CacheConfig;
use crate::pattern::KeyMatcher;

/// In-memory index over the live key set.
///
/// Single-threaded semantics; [`ConcurrentKeyCache`](crate::cache::ConcurrentKeyCache)
/// layers the locking discipline on top.
pub struct KeyCache {
    /// Presence map: key to current deadline
    deadlines: HashMap<Vec<u8>, Deadline>,
    /// Expiry index ordered by (deadline, key)
    expiry: BTreeSet<CacheEntry>,
    /// Entries dropped by the sweeper over the cache's lifetime
    expired_count: u64,
}

impl KeyCache {
    /// Create an empty cache with default configuration.
    pub fn new() -> Self {
        Self::with_config(&CacheConfig::default())
    }

    /// Create an empty cache, pre-sizing the presence map.
    pub fn with_config(config: &CacheConfig) -> Self {
        Self {
            deadlines: HashMap::with_capacity(config.initial_capacity),
            expiry: BTreeSet::new(),
            expired_count: 0,
        }
    }

    /// Ensure `key` is present with no expiry.
    ///
    /// No-op if the key is already present.
    pub fn insert(&mut self, key: &[u8]) {
        self.insert_with_deadline(key, NEVER);
    }

    /// Ensure `key` is present; if absent, insert it with the given
    /// absolute deadline (negative means no expiry).
    ///
    /// If the key is already present its existing deadline is kept and
    /// `deadline` is ignored: insertion asserts presence, [`expire`]
    /// mutates lifetime. A previous incarnation of the key whose deadline
    /// has passed is swept before the check, so the insert proceeds.
    ///
    /// [`expire`]: KeyCache::expire
    pub fn insert_with_deadline(&mut self, key: &[u8], deadline: Deadline) {
        self.evict_expired();
        if self.deadlines.contains_key(key) {
            return;
        }
        let deadline = normalize_deadline(deadline);
        self.expiry.insert(CacheEntry {
            deadline,
            key: key.to_vec(),
        });
        self.deadlines.insert(key.to_vec(), deadline);
    }

    /// Remove `key` from both indices. Returns whether it was present.
    pub fn remove(&mut self, key: &[u8]) -> bool {
        self.evict_expired();
        match self.deadlines.remove_entry(key) {
            Some((key, deadline)) => {
                self.expiry.remove(&CacheEntry { deadline, key });
                true
            }
            None => false,
        }
    }

    /// Replace the deadline of a present key (negative means no expiry).
    /// Returns whether the key was present.
    ///
    /// The expiry entry is removed and reinserted to keep the index
    /// ordered. A new deadline already in the past leaves the key in place;
    /// the next operation sweeps it.
    pub fn expire(&mut self, key: &[u8], deadline: Deadline) -> bool {
        self.evict_expired();
        let Some(previous) = self.deadlines.get(key).copied() else {
            return false;
        };
        let deadline = normalize_deadline(deadline);
        if let Some(mut entry) = self.expiry.take(&CacheEntry {
            deadline: previous,
            key: key.to_vec(),
        }) {
            entry.deadline = deadline;
            self.expiry.insert(entry);
        }
        if let Some(current) = self.deadlines.get_mut(key) {
            *current = deadline;
        }
        true
    }

    /// Return every live key matching `pattern`, in no particular order.
    ///
    /// Callers that need sorted output sort the result themselves.
    pub fn keys(&mut self, pattern: &[u8]) -> Vec<Vec<u8>> {
        self.evict_expired();
        let matcher = KeyMatcher::compile(pattern);
        self.scan(&matcher)
    }

    /// Number of live keys.
    pub fn len(&mut self) -> usize {
        self.evict_expired();
        self.deadlines.len()
    }

    pub fn is_empty(&mut self) -> bool {
        self.len() == 0
    }

    /// Whether `key` is live.
    pub fn contains(&mut self, key: &[u8]) -> bool {
        self.evict_expired();
        self.deadlines.contains_key(key)
    }

    /// Current deadline of a live key ([`NEVER`] when it has no expiry).
    pub fn deadline(&mut self, key: &[u8]) -> Option<Deadline> {
        self.evict_expired();
        self.deadlines.get(key).copied()
    }

    /// Clear both indices.
    pub fn clear(&mut self) {
        self.expiry.clear();
        self.deadlines.clear();
    }

    /// Entries dropped by the sweeper over the cache's lifetime.
    pub fn expired_count(&self) -> u64 {
        self.expired_count
    }

    /// Drain every entry whose deadline has passed.
    ///
    /// Captures a single wall-clock reading, then pops the expiry index
    /// from its minimum until the first entry strictly in the future.
    /// O(expirations) per call, amortized O(1) per inserted entry.
    pub fn evict_expired(&mut self) -> usize {
        let now = clock::epoch_millis();
        self.evict_expired_at(now)
    }

    pub(crate) fn evict_expired_at(&mut self, now: i64) -> usize {
        let mut evicted = 0;
        while self
            .expiry
            .first()
            .is_some_and(|entry| entry.deadline <= now)
        {
            if let Some(entry) = self.expiry.pop_first() {
                self.deadlines.remove(&entry.key);
                evicted += 1;
            }
        }
        if evicted > 0 {
            self.expired_count += evicted as u64;
            trace!(evicted, "dropped expired keys");
        }
        evicted
    }

    /// Scan the presence map with a pre-compiled matcher, without draining
    /// expired entries first.
    pub(crate) fn scan(&self, matcher: &KeyMatcher) -> Vec<Vec<u8>> {
        self.deadlines
            .keys()
            .filter(|key| matcher.matches(key))
            .cloned()
            .collect()
    }

    /// Cardinality without draining expired entries first.
    pub(crate) fn cardinality(&self) -> usize {
        self.deadlines.len()
    }

    /// Earliest deadline in the expiry index.
    pub(crate) fn next_deadline(&self) -> Option<Deadline> {
        self.expiry.first().map(|entry| entry.deadline)
    }

    /// Deadline lookup without draining expired entries first.
    pub(crate) fn peek(&self, key: &[u8]) -> Option<Deadline> {
        self.deadlines.get(key).copied()
    }
}

impl Default for KeyCache {
    fn default() -> Self {
        Self::new()
    }
}
