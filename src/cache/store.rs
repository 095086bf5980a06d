//! TTL-keyed in-memory response store.

use dashmap::DashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::cache::CacheStatus;
use crate::http::response::ResponseEnvelope;
use crate::observability::metrics;

/// A cached upstream response and the moment it was stored.
#[derive(Debug, Clone)]
pub struct CachedEntry {
    pub envelope: ResponseEnvelope,
    pub stored_at: Instant,
}

impl CachedEntry {
    pub fn age(&self) -> Duration {
        self.stored_at.elapsed()
    }

    /// Valid while `age <= ttl`.
    pub fn is_fresh(&self, ttl: Duration) -> bool {
        self.is_fresh_at(Instant::now(), ttl)
    }

    /// Freshness as of `now`; the entry is still fresh at exactly `ttl` old.
    pub fn is_fresh_at(&self, now: Instant, ttl: Duration) -> bool {
        now.saturating_duration_since(self.stored_at) <= ttl
    }
}

/// A thread-safe response cache keyed by public path.
#[derive(Clone)]
pub struct ResponseCache {
    inner: Arc<DashMap<String, CachedEntry>>,
    ttl: Duration,
}

impl ResponseCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            inner: Arc::new(DashMap::new()),
            ttl,
        }
    }

    /// Return the fresh entry for `key`, evicting it if it has gone stale.
    pub fn lookup(&self, key: &str) -> Option<CachedEntry> {
        // Clone out so no shard guard is held across the removal below.
        let entry = self.inner.get(key).map(|r| r.value().clone());

        let result = match entry {
            Some(entry) if entry.is_fresh(self.ttl) => Some(entry),
            Some(stale) => {
                // Only drop the entry we judged stale; a concurrent store may have replaced it.
                self.inner
                    .remove_if(key, |_, current| current.stored_at == stale.stored_at);
                metrics::record_cache_size(self.inner.len());
                tracing::debug!(key, age_ms = stale.age().as_millis() as u64, "Evicted stale cache entry");
                None
            }
            None => None,
        };

        metrics::record_cache_lookup(if result.is_some() {
            CacheStatus::Hit
        } else {
            CacheStatus::Miss
        });
        result
    }

    /// Insert or overwrite the entry for `key`, stamped now.
    pub fn store(&self, key: &str, envelope: ResponseEnvelope) {
        self.inner.insert(
            key.to_string(),
            CachedEntry {
                envelope,
                stored_at: Instant::now(),
            },
        );
        metrics::record_cache_size(self.inner.len());
    }

    /// Entries currently held, stale ones included.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}
