//! Two-tier snapshot cache
//!
//! A durable single-record file store plus an in-process memory mirror. Reads
//! check tiers in a fixed order (file first); writes are full-snapshot
//! replaces, last-writer-wins, no merging. A corrupt durable record is a
//! miss, never a hard failure.

mod entry;
mod file;

pub use entry::CacheEntry;
pub use file::{CacheError, FileStore};

use crate::config::CacheConfig;
use crate::telemetry;
use crate::ticker::Snapshot;
use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;

/// Which tier satisfied a read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheTier {
    FileFresh,
    MemoryFresh,
    FileStale,
    MemoryStale,
}

/// Two-tier price cache with explicit freshness windows
///
/// Constructed once at process start and shared by handle; the fetch-success
/// path is the only writer.
pub struct PriceCache {
    file: FileStore,
    memory: RwLock<Option<CacheEntry>>,
    fresh_ttl: Duration,
    stale_ttl: Duration,
}

impl PriceCache {
    /// Create a cache from the service configuration
    pub fn from_config(config: &CacheConfig) -> Self {
        Self::new(
            FileStore::new(&config.dir),
            Duration::seconds(config.fresh_ttl_secs as i64),
            Duration::seconds(config.stale_ttl_secs as i64),
        )
    }

    /// Create a cache with explicit TTLs
    pub fn new(file: FileStore, fresh_ttl: Duration, stale_ttl: Duration) -> Self {
        Self {
            file,
            memory: RwLock::new(None),
            fresh_ttl,
            stale_ttl,
        }
    }

    /// Read a fresh entry: durable tier first, then the memory mirror
    ///
    /// A durable-fresh hit repopulates the mirror so later reads skip disk.
    pub async fn read_fresh(&self, now: DateTime<Utc>) -> Option<(CacheEntry, CacheTier)> {
        if let Some(entry) = self.file.load() {
            if entry.is_fresh(now, self.fresh_ttl) {
                telemetry::record_cache_hit(CacheTier::FileFresh);
                *self.memory.write().await = Some(entry.clone());
                return Some((entry, CacheTier::FileFresh));
            }
        }

        let memory = self.memory.read().await;
        if let Some(entry) = memory.as_ref() {
            if entry.is_fresh(now, self.fresh_ttl) {
                telemetry::record_cache_hit(CacheTier::MemoryFresh);
                return Some((entry.clone(), CacheTier::MemoryFresh));
            }
        }

        None
    }

    /// Read a stale-but-usable entry, durable tier first
    ///
    /// Entries older than the stale TTL are treated as absent so the service
    /// never serves arbitrarily old data.
    pub async fn read_stale(&self, now: DateTime<Utc>) -> Option<(CacheEntry, CacheTier)> {
        if let Some(entry) = self.file.load() {
            if entry.is_usable(now, self.stale_ttl) {
                telemetry::record_cache_hit(CacheTier::FileStale);
                return Some((entry, CacheTier::FileStale));
            }
        }

        let memory = self.memory.read().await;
        if let Some(entry) = memory.as_ref() {
            if entry.is_usable(now, self.stale_ttl) {
                telemetry::record_cache_hit(CacheTier::MemoryStale);
                return Some((entry.clone(), CacheTier::MemoryStale));
            }
        }

        None
    }

    /// Overwrite both tiers with a fresh snapshot
    ///
    /// The memory mirror is updated even when the durable write fails, so a
    /// broken disk degrades to memory-only caching instead of refetch storms.
    pub async fn store(&self, tickers: Snapshot, now: DateTime<Utc>) -> Result<(), CacheError> {
        let entry = CacheEntry::new(tickers, now);
        *self.memory.write().await = Some(entry.clone());
        self.file.store(&entry)
    }

    /// Load a usable durable record into the memory mirror at startup
    pub async fn warm(&self, now: DateTime<Utc>) -> bool {
        match self.file.load() {
            Some(entry) if entry.is_usable(now, self.stale_ttl) => {
                tracing::info!(
                    age_secs = entry.age(now).num_seconds(),
                    "Warmed memory cache from durable record"
                );
                *self.memory.write().await = Some(entry);
                true
            }
            _ => false,
        }
    }

    /// Durable record path (diagnostics)
    pub fn file_path(&self) -> &std::path::Path {
        self.file.path()
    }
}
