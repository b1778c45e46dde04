//! Local cache for resolution results
//!
//! The pipeline reads and writes plain string values by key. Stores keep a
//! creation timestamp per entry and nothing else; freshness is decided by
//! the reader.

pub mod codec;
pub mod key;
pub mod memory;
pub mod storage;

use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::config::Config;
use crate::error::CacheError;

/// A stored value and when it was written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    pub key: String,
    pub value: String,
    pub created_at: DateTime<Utc>,
}

impl CacheEntry {
    /// Whether the entry is older than `ttl` at `now`
    pub fn is_stale(&self, ttl: Duration, now: DateTime<Utc>) -> bool {
        let age = now.signed_duration_since(self.created_at);
        match chrono::Duration::from_std(ttl) {
            Ok(ttl) => age >= ttl,
            Err(_) => false,
        }
    }
}

/// Key/value persistence with creation timestamps.
///
/// Writing an existing key replaces it, so a store never holds more than one
/// entry per key.
pub trait CacheStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<CacheEntry>, CacheError>;
    fn put(&self, key: &str, value: &str) -> Result<(), CacheError>;
    fn delete(&self, key: &str) -> Result<(), CacheError>;
}

/// Freshness windows per entry type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheTtl {
    /// Search-ID and detail entries
    pub search: Duration,
    /// Trailer entries; `None` means they never go stale
    pub trailer: Option<Duration>,
}

impl CacheTtl {
    pub const SEARCH: Duration = Duration::from_secs(24 * 60 * 60); // 24 hr

    pub fn from_config(config: &Config) -> Self {
        Self {
            search: config.cache_ttl(),
            trailer: config.trailer_cache_ttl(),
        }
    }
}

impl Default for CacheTtl {
    fn default() -> Self {
        Self {
            search: Self::SEARCH,
            trailer: None,
        }
    }
}

// Re-export main types
pub use codec::CachedValue;
pub use memory::MemoryCacheStore;
pub use storage::SqliteCacheStore;
