//! Response cache keyed by endpoint and filter signature.
//!
//! Entries expire lazily: a lookup at or past the TTL is a miss and drops the
//! entry. The cache is bounded by entry count and evicts the least recently
//! used entry when full. It is an explicit component shared through `Arc`;
//! [`ResponseCache::clear`] is the reset.
//!
//! The mutex is never held across an `.await`, so a lookup or store is
//! atomic with respect to every other cache operation.

use std::num::NonZeroUsize;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use lru::LruCache;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    fetched_at: Instant,
}

/// Lookup counters since construction or the last [`ResponseCache::clear`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    /// Misses caused by an entry past its TTL.
    pub expired: u64,
    /// Entries dropped to stay within capacity.
    pub evictions: u64,
}

struct Inner<V> {
    entries: LruCache<String, CacheEntry<V>>,
    stats: CacheStats,
}

/// TTL + LRU cache of normalised payloads.
pub struct ResponseCache<V = Vec<Value>> {
    inner: Mutex<Inner<V>>,
    capacity: usize,
}

impl<V: Clone> ResponseCache<V> {
    /// Create a cache holding at most `capacity` entries; `0` means unbounded.
    pub fn new(capacity: usize) -> Self {
        let entries = match NonZeroUsize::new(capacity) {
            Some(cap) => LruCache::new(cap),
            None => LruCache::unbounded(),
        };
        Self {
            inner: Mutex::new(Inner {
                entries,
                stats: CacheStats::default(),
            }),
            capacity,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner<V>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Fresh value for `key`, or `None` if absent or at least `ttl` old.
    pub fn get(&self, key: &str, ttl: Duration) -> Option<V> {
        self.get_at(key, ttl, Instant::now())
    }

    /// [`get`](Self::get) evaluated at `now`.
    pub fn get_at(&self, key: &str, ttl: Duration, now: Instant) -> Option<V> {
        let mut guard = self.lock();
        let inner = &mut *guard;

        // `peek` leaves recency alone; only a fresh hit counts as a use.
        let stale = inner
            .entries
            .peek(key)
            .map(|entry| now.saturating_duration_since(entry.fetched_at) >= ttl);

        match stale {
            None => {
                inner.stats.misses += 1;
                None
            }
            Some(true) => {
                inner.entries.pop(key);
                inner.stats.misses += 1;
                inner.stats.expired += 1;
                debug!(key, "cache entry expired");
                None
            }
            Some(false) => {
                let value = inner.entries.get(key).map(|entry| entry.value.clone());
                inner.stats.hits += 1;
                value
            }
        }
    }

    /// Store `value` under `key`, stamped now.
    pub fn put(&self, key: impl Into<String>, value: V) {
        self.put_at(key, value, Instant::now());
    }

    /// [`put`](Self::put) stamped at `now`.
    pub fn put_at(&self, key: impl Into<String>, value: V, now: Instant) {
        let key = key.into();
        let mut guard = self.lock();
        let inner = &mut *guard;

        let entry = CacheEntry {
            value,
            fetched_at: now,
        };
        // `push` hands back the replaced entry on overwrite, the evicted one otherwise.
        if let Some((dropped, _)) = inner.entries.push(key.clone(), entry) {
            if dropped != key {
                inner.stats.evictions += 1;
                debug!(key = %dropped, "evicted least recently used cache entry");
            }
        }
    }

    /// Drop every entry whose key starts with `prefix`. Returns how many went.
    pub fn invalidate_prefix(&self, prefix: &str) -> usize {
        let mut guard = self.lock();
        let inner = &mut *guard;
        let doomed: Vec<String> = inner
            .entries
            .iter()
            .filter(|(k, _)| k.starts_with(prefix))
            .map(|(k, _)| k.clone())
            .collect();
        for key in &doomed {
            inner.entries.pop(key);
        }
        doomed.len()
    }

    /// Drop everything and reset the counters.
    pub fn clear(&self) {
        let mut inner = self.lock();
        inner.entries.clear();
        inner.stats = CacheStats::default();
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn stats(&self) -> CacheStats {
        self.lock().stats
    }
}

impl<V> std::fmt::Debug for ResponseCache<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResponseCache")
            .field("capacity", &self.capacity)
            .finish_non_exhaustive()
    }
}
