//! Shared Cache Module
//!
//! Thread-safe handle around [`CacheStore`]. Every public method takes the
//! one lock for its whole duration; the store's internal sweeps and culls run
//! while it is held, so no call ever re-enters the lock.

use std::borrow::Borrow;
use std::hash::Hash;
use std::time::Duration;

use parking_lot::Mutex;

use crate::cache::size::{DeepSizeEstimator, SizeEstimator};
use crate::cache::stats::CacheStats;
use crate::cache::store::{CacheStore, PutOutcome};
use crate::cache::views::{EntrySet, KeySet, Values};
use crate::config::CacheConfig;
use crate::error::Result;

// == Cache ==
/// Size-bounded LRU cache with TTL expiration, safe to share via `Arc`.
#[derive(Debug)]
pub struct Cache<K, V, E = DeepSizeEstimator> {
    inner: Mutex<CacheStore<K, V, E>>,
}

impl<K, V, E> Cache<K, V, E>
where
    K: Eq + Hash + Clone,
    E: SizeEstimator<V> + Default,
{
    // == Constructor ==
    /// Creates a new cache using the estimator's default instance.
    pub fn new(config: CacheConfig) -> Self {
        Self::from_store(CacheStore::new(config))
    }
}

impl<K, V, E> Cache<K, V, E>
where
    K: Eq + Hash + Clone,
    E: SizeEstimator<V>,
{
    /// Creates a new cache with an explicit size estimator.
    pub fn with_estimator(config: CacheConfig, estimator: E) -> Self {
        Self::from_store(CacheStore::with_estimator(config, estimator))
    }

    /// Wraps an existing store.
    pub fn from_store(store: CacheStore<K, V, E>) -> Self {
        Self {
            inner: Mutex::new(store),
        }
    }

    /// Unwraps the store.
    pub fn into_store(self) -> CacheStore<K, V, E> {
        self.inner.into_inner()
    }

    // == Put ==
    /// Stores a value; see [`CacheStore::put`].
    pub fn put(&self, key: K, value: V) -> PutOutcome<V> {
        self.inner.lock().put(key, value)
    }

    /// Stores a value, reporting an oversized one as an error.
    pub fn try_put(&self, key: K, value: V) -> Result<Option<V>> {
        self.inner.lock().try_put(key, value)
    }

    // == Put All ==
    /// Puts every pair. The lock is taken once per pair, so other threads
    /// may observe a partially applied batch.
    pub fn put_all<I>(&self, pairs: I)
    where
        I: IntoIterator<Item = (K, V)>,
    {
        for (key, value) in pairs {
            self.put(key, value);
        }
    }

    // == Get ==
    /// Returns a clone of the value for `key`.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        V: Clone,
    {
        self.inner.lock().get(key).cloned()
    }

    /// Runs `f` on the value for `key` without cloning it.
    ///
    /// `f` runs while the lock is held and must not call back into the cache.
    pub fn get_with<Q, R, F>(&self, key: &Q, f: F) -> Option<R>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        F: FnOnce(&V) -> R,
    {
        self.inner.lock().get(key).map(f)
    }

    // == Remove ==
    /// Removes an entry and returns its value. Does not sweep.
    pub fn remove<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.lock().remove(key)
    }

    // == Clear ==
    /// Removes every entry and resets all counters.
    pub fn clear(&self) {
        self.inner.lock().clear();
    }

    // == Length ==
    /// Returns the number of live entries.
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    /// Returns true if no live entries remain.
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    // == Contains ==
    /// Checks for a live entry without counting a hit or miss.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.lock().contains_key(key)
    }

    /// Linear scan over live values.
    pub fn contains_value(&self, value: &V) -> bool
    where
        V: PartialEq,
    {
        self.inner.lock().contains_value(value)
    }

    // == Snapshots ==
    /// Copies the live keys, most recently used first.
    pub fn key_set(&self) -> KeySet<K> {
        self.inner.lock().key_set()
    }

    /// Copies the live values, most recently used first.
    pub fn values(&self) -> Values<V>
    where
        V: Clone,
    {
        self.inner.lock().values()
    }

    /// Copies the live key-value pairs, most recently used first.
    pub fn entry_set(&self) -> EntrySet<K, V>
    where
        V: Clone,
    {
        self.inner.lock().entry_set()
    }

    // == Name ==
    /// Returns a copy of the display name.
    pub fn name(&self) -> String {
        self.inner.lock().name().to_string()
    }

    /// Renames the cache. Contents are unaffected.
    pub fn set_name(&self, name: impl Into<String>) {
        self.inner.lock().set_name(name);
    }

    // == Hit Counters ==
    /// Lookups that found a live entry since creation or the last clear.
    pub fn cache_hits(&self) -> u64 {
        self.inner.lock().cache_hits()
    }

    /// Lookups that found nothing since creation or the last clear.
    pub fn cache_misses(&self) -> u64 {
        self.inner.lock().cache_misses()
    }

    // == Cache Size ==
    /// Current estimated size in bytes. Does not sweep.
    pub fn cache_size(&self) -> usize {
        self.inner.lock().cache_size()
    }

    // == Max Cache Size ==
    /// Returns the byte budget, None when unlimited.
    pub fn max_cache_size(&self) -> Option<usize> {
        self.inner.lock().max_cache_size()
    }

    /// Changes the byte budget, culling immediately if needed.
    pub fn set_max_cache_size(&self, max_size: Option<usize>) {
        self.inner.lock().set_max_cache_size(max_size);
    }

    // == Max Lifetime ==
    /// Returns the entry lifetime, None when entries never expire.
    pub fn max_lifetime(&self) -> Option<Duration> {
        self.inner.lock().max_lifetime()
    }

    /// Changes the entry lifetime. A zero duration disables expiration.
    pub fn set_max_lifetime(&self, max_lifetime: Option<Duration>) {
        self.inner.lock().set_max_lifetime(max_lifetime);
    }

    // == Stats ==
    /// Snapshot of counters and sizes. Does not sweep.
    pub fn stats(&self) -> CacheStats {
        self.inner.lock().stats()
    }
}
