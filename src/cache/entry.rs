//! Expiry-index entry and deadline representation

/// Absolute expiry instant in milliseconds since the Unix epoch.
pub type Deadline = i64;

/// Sentinel deadline for keys that never expire.
pub const NEVER: Deadline = i64::MAX;

/// Clamp a caller-supplied deadline into the valid range.
///
/// The surrounding command layer encodes "no expiry" as a negative value,
/// which normalizes to [`NEVER`].
pub fn normalize_deadline(deadline: Deadline) -> Deadline {
    if deadline < 0 {
        NEVER
    } else {
        deadline
    }
}

/// Record stored in the expiry index.
///
/// Field order carries the ordering: entries sort by deadline first, then
/// key, so the index can pop its earliest deadline and still remove an
/// arbitrary `(deadline, key)` pair.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct CacheEntry {
    pub deadline: Deadline,
    pub key: Vec<u8>,
}

impl CacheEntry {
    pub fn new(key: Vec<u8>, deadline: Deadline) -> Self {
        Self {
            deadline: normalize_deadline(deadline),
            key,
        }
    }

    /// True when the entry carries a finite deadline.
    pub fn has_deadline(&self) -> bool {
        self.deadline != NEVER
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_deadline_normalizes_to_never() {
        assert_eq!(normalize_deadline(-1), NEVER);
        assert_eq!(normalize_deadline(i64::MIN), NEVER);
        assert_eq!(normalize_deadline(0), 0);
        assert_eq!(normalize_deadline(42), 42);
    }

    #[test]
    fn test_entry_ordering_is_deadline_then_key() {
        let a = CacheEntry::new(b"a".to_vec(), 10);
        let b = CacheEntry::new(b"b".to_vec(), 10);
        let c = CacheEntry::new(b"a".to_vec(), 20);
        assert!(a < b);
        assert!(b < c);
        assert!(a < c);
    }

    #[test]
    fn test_has_deadline() {
        assert!(CacheEntry::new(b"k".to_vec(), 1000).has_deadline());
        assert!(!CacheEntry::new(b"k".to_vec(), NEVER).has_deadline());
        assert!(!CacheEntry::new(b"k".to_vec(), -5).has_deadline());
    }
}
