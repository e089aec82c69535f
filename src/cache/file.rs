//! Durable single-record file store
//!
//! One JSON record per logical dataset, replaced wholesale on every write.
//! Writes go to a temp file and rename into place so readers never observe a
//! half-written record.

use super::entry::CacheEntry;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name of the one record this service persists
const CACHE_FILE: &str = "crypto-prices.json";

/// Cache persistence errors
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("cache serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Durable store holding the `crypto-prices` record
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Create a store rooted at the given cache directory
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(CACHE_FILE),
        }
    }

    /// Load the record, treating any read or parse error as a miss
    pub fn load(&self) -> Option<CacheEntry> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                tracing::warn!(path = ?self.path, error = %e, "Failed to read cache record");
                return None;
            }
        };

        match serde_json::from_str(&content) {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::warn!(path = ?self.path, error = %e, "Corrupt cache record, treating as miss");
                None
            }
        }
    }

    /// Replace the record atomically (write temp, then rename)
    pub fn store(&self, entry: &CacheEntry) -> Result<(), CacheError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string(entry)?;
        let tmp_path = self.path.with_extension("json.tmp");
        std::fs::write(&tmp_path, json)?;
        std::fs::rename(&tmp_path, &self.path)?;

        tracing::debug!(path = ?self.path, tickers = entry.tickers.len(), "Stored cache record");
        Ok(())
    }

    /// Path of the durable record
    pub fn path(&self) -> &Path {
        &self.path
    }
}
