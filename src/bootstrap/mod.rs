//! Bootstrap of the keyspace cache from the engine's persistent meta index
//!
//! At process start the durable meta keyspace is the only source of truth
//! for which keys are live and when they expire. The loader walks that
//! namespace once, inserts every top-level key with its persisted deadline,
//! and jumps composite payloads past their sub-key ranges. It runs before
//! the first external request is serviced, so it relies on the cache's own
//! operation-level locking and takes none of its own.

use tracing::{info, warn};

use crate::cache::{ConcurrentKeyCache, NEVER};

/// Kind discriminator for records in the meta keyspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    /// A top-level key's metadata record
    Meta,
    /// A plain single-value payload
    String,
    Hash,
    List,
    Set,
    ZSet,
    Stream,
    HyperLogLog,
}

impl RecordKind {
    /// Composite payloads store their elements as sub-key records ordered
    /// directly after the meta record in the same namespace.
    pub fn has_subkeys(&self) -> bool {
        !matches!(self, RecordKind::Meta | RecordKind::String)
    }
}

/// Key half of a meta-keyspace record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetaKey {
    pub kind: RecordKind,
    pub user_key: Vec<u8>,
}

/// Value half of a meta record: the payload kind and the persisted absolute
/// expiry in milliseconds since the epoch, 0 meaning no expiry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetaValue {
    pub kind: RecordKind,
    pub expire_at_ms: i64,
}

/// Decoding failure for a single meta record.
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("unknown record kind {0:#04x}")]
    UnknownKind(u8),
    #[error("truncated meta record")]
    Truncated,
}

/// Ordered cursor over the engine's meta namespace.
///
/// The engine positions a freshly opened iterator at the first record of
/// the namespace. `jump` repositions at the smallest record whose user key
/// is greater than or equal to the target.
pub trait MetaIterator {
    fn valid(&self) -> bool;
    fn key(&self) -> Result<MetaKey, RecordError>;
    fn value(&self) -> Result<MetaValue, RecordError>;
    fn next(&mut self);
    fn jump(&mut self, user_key: &[u8]);
}

/// Outcome of a bootstrap pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Meta records inserted into the cache
    pub loaded: usize,
    /// Records skipped as malformed
    pub skipped: usize,
    /// Entries dropped by the final sweep (already expired on disk)
    pub evicted: usize,
}

/// Rebuild `cache` from the engine's meta keyspace.
///
/// Each meta record contributes one cache entry, with a persisted expiry of
/// 0 normalized to "never". Composite payloads are skipped past their
/// sub-key range by jumping to `user_key` followed by a single NUL, the
/// smallest key strictly greater than any of their sub-keys. Malformed
/// records are skipped and counted; the first one is logged at warning
/// severity. A final sweep drops entries whose persisted deadline has
/// already passed.
pub fn load_keyspace<I: MetaIterator>(cache: &ConcurrentKeyCache, iter: &mut I) -> LoadReport {
    let mut report = LoadReport::default();
    let mut warned = false;

    while iter.valid() {
        let (key, value) = match (iter.key(), iter.value()) {
            (Ok(key), Ok(value)) if key.kind == RecordKind::Meta => (key, value),
            (Ok(key), Ok(_)) => {
                report.skipped += 1;
                if !warned {
                    warn!(kind = ?key.kind, "non-meta record in meta namespace, skipping");
                    warned = true;
                }
                iter.next();
                continue;
            }
            (Err(err), _) | (_, Err(err)) => {
                report.skipped += 1;
                if !warned {
                    warn!(error = %err, "corrupt meta record, skipping");
                    warned = true;
                }
                iter.next();
                continue;
            }
        };

        let deadline = if value.expire_at_ms == 0 {
            NEVER
        } else {
            value.expire_at_ms
        };
        cache.insert_with_deadline(&key.user_key, deadline);
        report.loaded += 1;

        if value.kind.has_subkeys() {
            // smallest key strictly greater than any sub-key of this entry
            let mut past_subkeys = key.user_key;
            past_subkeys.push(0x00);
            iter.jump(&past_subkeys);
        } else {
            iter.next();
        }
    }

    report.evicted = cache.evict_expired();
    info!(
        loaded = report.loaded,
        skipped = report.skipped,
        evicted = report.evicted,
        "keyspace cache loaded"
    );
    report
}
