//! Wall-clock reading used by the TTL sweeper

use chrono::Utc;

/// Current wall-clock time in milliseconds since the Unix epoch.
///
/// The sweeper captures exactly one reading per pass. A clock that jumps
/// backwards only delays expiry; it never resurrects a swept key.
pub fn epoch_millis() -> i64 {
    Utc::now().timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_epoch_millis_is_monotonic_enough() {
        let a = epoch_millis();
        let b = epoch_millis();
        // Same-process consecutive readings are at most a clock adjustment apart
        assert!(b >= a - 1000);
        // Sanity: after 2020-01-01
        assert!(a > 1_577_836_800_000);
    }
}
