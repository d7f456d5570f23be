//! Cache manager for keeping API responses in memory
//!
//! Provides a `CacheManager` backed by a concurrent `moka` cache. Entries carry
//! the time they were written so callers can tell how old a response is.

use std::time::Duration;

use chrono::{DateTime, Utc};
use moka::future::Cache;

#[derive(Clone)]
struct Stored<T> {
    value: T,
    written_at: DateTime<Utc>,
}

/// A cache hit, stamped with the time it was written
#[derive(Debug, Clone)]
pub struct CachedData<T> {
    pub data: T,
    pub cached_at: DateTime<Utc>,
}

/// Manages reading and writing cached data
///
/// Safe to share between concurrent requests: clones point at the same
/// underlying store, and the last writer wins when two requests store the
/// same key.
#[derive(Clone)]
pub struct CacheManager<T> {
    entries: Cache<String, Stored<T>>,
    ttl: Duration,
}

impl<T> std::fmt::Debug for CacheManager<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheManager")
            .field("ttl", &self.ttl)
            .field("entries", &self.entries.entry_count())
            .finish()
    }
}

impl<T> CacheManager<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Creates a new CacheManager
    ///
    /// # Arguments
    /// * `ttl` - How long an entry stays readable after it is written
    /// * `max_entries` - Capacity bound; least recently used entries go first
    pub fn new(ttl: Duration, max_entries: u64) -> Self {
        let entries = Cache::builder()
            .max_capacity(max_entries)
            .time_to_live(ttl)
            .build();
        Self { entries, ttl }
    }

    /// Time-to-live applied to every entry
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Writes data to the cache under `key`, replacing any previous entry
    pub async fn write(&self, key: &str, data: T) {
        let stored = Stored {
            value: data,
            written_at: Utc::now(),
        };
        self.entries.insert(key.to_string(), stored).await;
    }

    /// Looks up `key`; `None` if it was never written or has expired
    pub async fn read(&self, key: &str) -> Option<CachedData<T>> {
        self.entries.get(key).await.map(|stored| CachedData {
            data: stored.value,
            cached_at: stored.written_at,
        })
    }
}
