//! Bounded TTL cache for generated training content.
//!
//! [`ContentCache`] maps a generation key (training type, level, domain) to
//! the last successfully generated document. Entries carry their own TTL and
//! are checked lazily on read: an entry whose age has reached its TTL is
//! evicted and reported as a miss. Capacity is bounded with LRU eviction
//! (moka) so long-running processes cannot grow the cache without limit.
//!
//! The cache is owned per service instance. Each process holds its own
//! independent copy; sharing across processes would need an external store
//! behind the same `get`/`set` surface.

use std::time::{Duration, Instant};

use moka::Expiry;
use moka::future::Cache;
use tracing::debug;

use crate::telemetry;
use crate::types::GeneratedContent;

/// Configuration for the content cache.
///
/// ```rust
/// # use examforge::cache::CacheConfig;
/// # use std::time::Duration;
/// let config = CacheConfig::new()
///     .max_entries(500)
///     .ttl(Duration::from_secs(600));
/// ```
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Maximum number of cached entries. Default: 1,000.
    pub max_entries: u64,
    /// Time-to-live applied by the service when it writes entries. Default: 30 minutes.
    pub ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: 1_000,
            ttl: Duration::from_secs(30 * 60),
        }
    }
}

impl CacheConfig {
    /// Create a new config with sensible defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum number of cached entries.
    pub fn max_entries(mut self, n: u64) -> Self {
        self.max_entries = n;
        self
    }

    /// Set the time-to-live for cached entries.
    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }
}

/// A cached document with its write time and lifetime.
#[derive(Debug, Clone)]
struct CacheEntry {
    key: String,
    data: GeneratedContent,
    timestamp: Instant,
    ttl: Duration,
}

impl CacheEntry {
    fn is_expired(&self) -> bool {
        self.timestamp.elapsed() >= self.ttl
    }
}

/// Per-entry expiry: every write resets the clock to the entry's own TTL.
struct EntryTtl;

impl Expiry<String, CacheEntry> for EntryTtl {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &CacheEntry,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(value.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &CacheEntry,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(value.ttl)
    }
}

/// In-memory content cache. See module docs.
pub struct ContentCache {
    entries: Cache<String, CacheEntry>,
}

impl ContentCache {
    /// Create a cache bounded by `config.max_entries`.
    pub fn new(config: &CacheConfig) -> Self {
        let entries = Cache::builder()
            .max_capacity(config.max_entries)
            .expire_after(EntryTtl)
            .build();
        Self { entries }
    }

    /// Look up a key.
    ///
    /// Returns `None` on miss. An entry whose age has reached its TTL is
    /// evicted here and reported as a miss. Emits cache hit/miss metrics.
    pub async fn get(&self, key: &str) -> Option<GeneratedContent> {
        match self.entries.get(key).await {
            Some(entry) if !entry.is_expired() => {
                metrics::counter!(telemetry::CACHE_HITS_TOTAL).increment(1);
                Some(entry.data)
            }
            Some(entry) => {
                debug!(
                    key = %entry.key,
                    age = ?entry.timestamp.elapsed(),
                    "evicting expired cache entry"
                );
                self.entries.invalidate(key).await;
                metrics::counter!(telemetry::CACHE_MISSES_TOTAL).increment(1);
                None
            }
            None => {
                metrics::counter!(telemetry::CACHE_MISSES_TOTAL).increment(1);
                None
            }
        }
    }

    /// Insert or overwrite the entry for `key`.
    pub async fn set(&self, key: &str, data: GeneratedContent, ttl: Duration) {
        let entry = CacheEntry {
            key: key.to_owned(),
            data,
            timestamp: Instant::now(),
            ttl,
        };
        self.entries.insert(key.to_owned(), entry).await;
    }

    /// Number of live entries, after applying pending evictions.
    pub async fn len(&self) -> u64 {
        self.entries.run_pending_tasks().await;
        self.entries.entry_count()
    }

    /// Whether the cache holds no live entries.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Evict all entries.
    pub fn clear(&self) {
        self.entries.invalidate_all();
    }
}
