//! Cache Store Module
//!
//! Main cache engine: a HashMap of entries threaded through two key lists.
//! The access list drives size-based culling (least recently used at the
//! tail), the age list drives TTL expiration (oldest insertion at the tail).
//!
//! `CacheStore` is single-owner (`&mut self`). Wrap it in [`crate::Cache`] to
//! share it between threads.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::cache::entry::CacheEntry;
use crate::cache::list::{AccessList, AgeList};
use crate::cache::size::{DeepSizeEstimator, SizeEstimator};
use crate::cache::stats::{CacheStats, Counters};
use crate::cache::views::{EntrySet, KeySet, Values};
use crate::cache::{CULL_TARGET_PERCENT, CULL_TRIGGER_PERCENT, DEFAULT_ENTRY_SIZE};
use crate::config::{normalize_lifetime, CacheConfig};
use crate::error::{CacheError, Result};

// == Put Outcome ==
/// Result of [`CacheStore::put`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PutOutcome<V> {
    /// The value was stored; `previous` is the value it replaced, if any
    Inserted { previous: Option<V> },
    /// The value was too large for the cache and is handed back untouched
    Rejected(V),
}

impl<V> PutOutcome<V> {
    /// The replaced value, or None for fresh inserts and rejections.
    pub fn previous(self) -> Option<V> {
        match self {
            PutOutcome::Inserted { previous } => previous,
            PutOutcome::Rejected(_) => None,
        }
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, PutOutcome::Rejected(_))
    }
}

// == Cache Store ==
/// Size-bounded LRU cache with TTL expiration.
#[derive(Debug)]
pub struct CacheStore<K, V, E = DeepSizeEstimator> {
    /// Display name, only used in diagnostics
    name: String,
    /// Key-value storage
    entries: HashMap<K, CacheEntry<V>>,
    /// Keys by access recency, head = most recently touched
    access: AccessList<K>,
    /// Keys by insertion time, head = newest
    age: AgeList<K>,
    /// Sum of estimated entry sizes in bytes
    size: usize,
    /// Hit, miss, eviction and expiration counters
    counters: Counters,
    /// Byte budget, None = unlimited
    max_size: Option<usize>,
    /// Entry lifetime, None = never expires
    max_lifetime: Option<Duration>,
    /// Computes entry sizes on insertion
    estimator: E,
}

impl<K, V, E> CacheStore<K, V, E>
where
    K: Eq + Hash + Clone,
    E: SizeEstimator<V> + Default,
{
    // == Constructor ==
    /// Creates a new CacheStore using the estimator's default instance.
    pub fn new(config: CacheConfig) -> Self {
        Self::with_estimator(config, E::default())
    }
}

impl<K, V, E> CacheStore<K, V, E>
where
    K: Eq + Hash + Clone,
    E: SizeEstimator<V>,
{
    /// Creates a new CacheStore with an explicit size estimator.
    pub fn with_estimator(config: CacheConfig, estimator: E) -> Self {
        Self {
            name: config.name,
            entries: HashMap::with_capacity(103),
            access: AccessList::new(),
            age: AgeList::new(),
            size: 0,
            counters: Counters::default(),
            max_size: config.max_size,
            max_lifetime: normalize_lifetime(config.max_lifetime),
            estimator,
        }
    }

    // == Put ==
    /// Stores a value, replacing any previous value for the key.
    ///
    /// A value whose estimated size exceeds 90% of the maximum size is not
    /// stored; it is returned as [`PutOutcome::Rejected`] and the cache is left
    /// unchanged.
    pub fn put(&mut self, key: K, value: V) -> PutOutcome<V> {
        match self.insert(key, value) {
            Ok(previous) => PutOutcome::Inserted { previous },
            Err((value, err)) => {
                warn!(cache = %self.name, "{}; value not cached", err);
                PutOutcome::Rejected(value)
            }
        }
    }

    // == Try Put ==
    /// Like [`put`](Self::put) but reports an oversized value as an error.
    pub fn try_put(&mut self, key: K, value: V) -> Result<Option<V>> {
        self.insert(key, value).map_err(|(_, err)| err)
    }

    // == Put All ==
    /// Puts every pair in order. Each insertion is independent.
    pub fn put_all<I>(&mut self, pairs: I)
    where
        I: IntoIterator<Item = (K, V)>,
    {
        for (key, value) in pairs {
            self.put(key, value);
        }
    }

    // == Get ==
    /// Retrieves a value and marks it most recently used.
    ///
    /// Expired entries are swept first, so a lookup never sees them.
    pub fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.sweep_expired();

        match self.entries.get(key) {
            Some(entry) => {
                self.counters.record_hit();
                self.access.move_to_front(entry.access_node);
                Some(&entry.value)
            }
            None => {
                self.counters.record_miss();
                None
            }
        }
    }

    // == Remove ==
    /// Removes an entry and returns its value.
    ///
    /// Does not sweep expired entries.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let entry = self.entries.remove(key)?;
        self.access.remove(entry.access_node);
        self.age.remove(entry.age_node);
        self.size -= entry.size;
        Some(entry.value)
    }

    // == Clear ==
    /// Removes every entry and resets all counters.
    pub fn clear(&mut self) {
        let keys: Vec<K> = self.access.keys().cloned().collect();
        for key in &keys {
            self.remove(key);
        }
        debug_assert_eq!(self.size, 0);

        self.access.clear();
        self.age.clear();
        self.size = 0;
        self.counters.reset();
    }

    // == Length ==
    /// Returns the number of live entries.
    pub fn len(&mut self) -> usize {
        self.sweep_expired();
        self.entries.len()
    }

    // == Is Empty ==
    /// Returns true if no live entries remain.
    pub fn is_empty(&mut self) -> bool {
        self.sweep_expired();
        self.entries.is_empty()
    }

    // == Contains ==
    /// Checks for a live entry without counting a hit or miss.
    pub fn contains_key<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.sweep_expired();
        self.entries.contains_key(key)
    }

    /// Linear scan over live values.
    ///
    /// To cache "empty" values, store `Option<T>`; `contains_value(&None)`
    /// then finds them.
    pub fn contains_value(&mut self, value: &V) -> bool
    where
        V: PartialEq,
    {
        self.sweep_expired();
        self.entries.values().any(|entry| &entry.value == value)
    }

    // == Snapshots ==
    /// Copies the live keys, most recently used first.
    pub fn key_set(&mut self) -> KeySet<K> {
        self.sweep_expired();
        KeySet::new(self.access.keys().cloned().collect())
    }

    /// Copies the live values, most recently used first.
    pub fn values(&mut self) -> Values<V>
    where
        V: Clone,
    {
        self.sweep_expired();
        let values = self
            .access
            .keys()
            .filter_map(|key| self.entries.get(key))
            .map(|entry| entry.value.clone())
            .collect();
        Values::new(values)
    }

    /// Copies the live key-value pairs, most recently used first.
    pub fn entry_set(&mut self) -> EntrySet<K, V>
    where
        V: Clone,
    {
        self.sweep_expired();
        let entries = self
            .access
            .keys()
            .filter_map(|key| {
                self.entries
                    .get(key)
                    .map(|entry| (key.clone(), entry.value.clone()))
            })
            .collect();
        EntrySet::new(entries)
    }

    // == Name ==
    /// Returns the display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Renames the cache. Contents are unaffected.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    // == Hit Counters ==
    /// Lookups that found a live entry since creation or the last clear.
    pub fn cache_hits(&self) -> u64 {
        self.counters.hits
    }

    /// Lookups that found nothing since creation or the last clear.
    pub fn cache_misses(&self) -> u64 {
        self.counters.misses
    }

    // == Cache Size ==
    /// Current estimated size in bytes. Does not sweep.
    pub fn cache_size(&self) -> usize {
        self.size
    }

    // == Max Cache Size ==
    /// Returns the byte budget, None when unlimited.
    pub fn max_cache_size(&self) -> Option<usize> {
        self.max_size
    }

    /// Changes the byte budget. Culls immediately if the cache is now too full.
    pub fn set_max_cache_size(&mut self, max_size: Option<usize>) {
        debug!(cache = %self.name, ?max_size, "max cache size changed");
        self.max_size = max_size;
        self.cull();
    }

    // == Max Lifetime ==
    /// Returns the entry lifetime, None when entries never expire.
    pub fn max_lifetime(&self) -> Option<Duration> {
        self.max_lifetime
    }

    /// Changes the entry lifetime. A zero duration disables expiration.
    pub fn set_max_lifetime(&mut self, max_lifetime: Option<Duration>) {
        debug!(cache = %self.name, ?max_lifetime, "max lifetime changed");
        self.max_lifetime = normalize_lifetime(max_lifetime);
    }

    // == Stats ==
    /// Snapshot of counters and sizes. Does not sweep.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            name: self.name.clone(),
            entries: self.entries.len(),
            size_bytes: self.size,
            max_size: self.max_size,
            max_lifetime_ms: self.max_lifetime.map(|d| d.as_millis() as u64),
            hits: self.counters.hits,
            misses: self.counters.misses,
            evictions: self.counters.evictions,
            expirations: self.counters.expirations,
            captured_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    // == Internal: Insert ==
    /// Stores a value or hands it back with the reason it was refused.
    fn insert(&mut self, key: K, value: V) -> std::result::Result<Option<V>, (V, CacheError)> {
        let size = self.estimate(&value);

        if let Some(limit) = self.max_size.map(|max| percent_of(max, CULL_TARGET_PERCENT)) {
            if size > limit {
                return Err((value, CacheError::Oversized { size, limit }));
            }
        }

        // The running total must stay representable
        let replaced = self.entries.get(&key).map_or(0, |entry| entry.size);
        let room = usize::MAX - (self.size - replaced);
        if size > room {
            return Err((value, CacheError::Oversized { size, limit: room }));
        }

        let previous = self.remove(&key);

        let access_node = self.access.add_first(key.clone(), ());
        let age_node = self.age.add_first(key.clone(), Instant::now());
        self.entries
            .insert(key, CacheEntry::new(value, size, access_node, age_node));
        self.size += size;

        self.cull();

        Ok(previous)
    }

    /// Asks the estimator for a size, charging the default on failure.
    fn estimate(&self, value: &V) -> usize {
        match self.estimator.estimate(value) {
            Ok(size) => size,
            Err(err) => {
                warn!(
                    cache = %self.name,
                    error = %err,
                    "size estimation failed, using default size {}",
                    DEFAULT_ENTRY_SIZE
                );
                DEFAULT_ENTRY_SIZE
            }
        }
    }

    // == Internal: Sweep Expired ==
    /// Removes entries older than the max lifetime, oldest first.
    ///
    /// Stops at the first entry that is still fresh: the age list is ordered
    /// by insertion time, so everything before it is fresher still.
    fn sweep_expired(&mut self) -> usize {
        let Some(lifetime) = self.max_lifetime else {
            return 0;
        };

        let now = Instant::now();
        let mut removed = 0;

        while let Some((_, inserted_at)) = self.age.peek_last() {
            if now.saturating_duration_since(*inserted_at) < lifetime {
                break;
            }
            let Some((key, _)) = self.age.remove_last() else {
                break;
            };
            if let Some(entry) = self.entries.remove(&key) {
                self.access.remove(entry.access_node);
                self.size -= entry.size;
                self.counters.record_expiration();
                removed += 1;
            }
        }

        if removed > 0 {
            debug!(cache = %self.name, removed, "expired entries swept");
        }
        removed
    }

    // == Internal: Cull ==
    /// Evicts least recently used entries once the cache reaches 97% of its
    /// budget, until it is at or below 90%.
    fn cull(&mut self) -> usize {
        let Some(max) = self.max_size else {
            return 0;
        };
        if self.size < percent_of(max, CULL_TRIGGER_PERCENT) {
            return 0;
        }

        // Expired entries go first.
        self.sweep_expired();

        let target = percent_of(max, CULL_TARGET_PERCENT);
        if self.size <= target {
            return 0;
        }

        let started = Instant::now();
        let mut removed = 0;
        while self.size > target {
            let Some((key, _)) = self.access.remove_last() else {
                break;
            };
            if let Some(entry) = self.entries.remove(&key) {
                self.age.remove(entry.age_node);
                self.size -= entry.size;
                self.counters.record_eviction();
                removed += 1;
            }
        }

        info!(
            cache = %self.name,
            removed,
            size = self.size,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "cache was full, shrank to {}%",
            CULL_TARGET_PERCENT
        );
        removed
    }

    /// Asserts the map/list bijection and the size accounting.
    #[cfg(test)]
    pub(crate) fn check_invariants(&self) {
        assert_eq!(self.access.len(), self.entries.len(), "access list length");
        assert_eq!(self.age.len(), self.entries.len(), "age list length");

        for (key, entry) in &self.entries {
            assert!(self.access.get(entry.access_node).map(|(k, _)| k) == Some(key));
            assert!(self.age.get(entry.age_node).map(|(k, _)| k) == Some(key));
        }

        let total: usize = self.entries.values().map(|e| e.size).sum();
        assert_eq!(self.size, total, "size accounting");

        let stamps: Vec<Instant> = self.age.iter().map(|(_, t)| *t).collect();
        assert!(stamps.windows(2).all(|w| w[0] >= w[1]), "age order");
    }
}

/// `percent`% of `max`, rounded down.
fn percent_of(max: usize, percent: u8) -> usize {
    (max as u128 * percent as u128 / 100) as usize
}
