//! Cache entry with explicit freshness predicates

use crate::ticker::Snapshot;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// One cached snapshot plus its storage timestamp
///
/// Freshness is evaluated against a caller-supplied `now` so tests can use
/// synthetic clocks instead of sleeping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// When the snapshot was stored
    pub stored_at: DateTime<Utc>,
    /// The full ticker set
    pub tickers: Snapshot,
}

impl CacheEntry {
    /// Create an entry stored at the given instant
    pub fn new(tickers: Snapshot, stored_at: DateTime<Utc>) -> Self {
        Self { stored_at, tickers }
    }

    /// Age of the entry relative to `now`
    pub fn age(&self, now: DateTime<Utc>) -> Duration {
        now - self.stored_at
    }

    /// Within the primary freshness window
    pub fn is_fresh(&self, now: DateTime<Utc>, fresh_ttl: Duration) -> bool {
        self.age(now) < fresh_ttl
    }

    /// Within the extended stale-but-usable window
    pub fn is_usable(&self, now: DateTime<Utc>, stale_ttl: Duration) -> bool {
        self.age(now) < stale_ttl
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry_at(stored_at: DateTime<Utc>) -> CacheEntry {
        CacheEntry::new(Vec::new(), stored_at)
    }

    #[test]
    fn test_fresh_within_window() {
        let stored = Utc::now();
        let entry = entry_at(stored);

        assert!(entry.is_fresh(stored + Duration::minutes(5), Duration::minutes(10)));
        assert!(!entry.is_fresh(stored + Duration::minutes(10), Duration::minutes(10)));
        assert!(!entry.is_fresh(stored + Duration::minutes(15), Duration::minutes(10)));
    }

    #[test]
    fn test_usable_within_stale_window() {
        let stored = Utc::now();
        let entry = entry_at(stored);

        assert!(entry.is_usable(stored + Duration::minutes(25), Duration::minutes(30)));
        assert!(!entry.is_usable(stored + Duration::minutes(30), Duration::minutes(30)));
    }

    #[test]
    fn test_age() {
        let stored = Utc::now();
        let entry = entry_at(stored);
        assert_eq!(entry.age(stored + Duration::seconds(90)).num_seconds(), 90);
    }

    #[test]
    fn test_entry_roundtrip() {
        let entry = CacheEntry::new(crate::ticker::fallback_snapshot(), Utc::now());
        let json = serde_json::to_string(&entry).unwrap();
        let back: CacheEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(back, entry);
    }
}
