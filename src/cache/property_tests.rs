//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check the store against a simple reference model and to
//! verify its bookkeeping invariants after every operation.

use proptest::prelude::*;
use std::collections::VecDeque;

use crate::cache::{CacheStore, PutOutcome, SizeEstimator};
use crate::config::CacheConfig;
use crate::error::Result;

// == Test Configuration ==
const TEST_MAX_SIZE: usize = 1000;
const TEST_TRIGGER: usize = 970;
const TEST_TARGET: usize = 900;

/// Values are their own size, which keeps scenarios easy to reason about.
#[derive(Debug, Default)]
struct ValueIsSize;

impl SizeEstimator<usize> for ValueIsSize {
    fn estimate(&self, value: &usize) -> Result<usize> {
        Ok(*value)
    }
}

type TestStore = CacheStore<String, usize, ValueIsSize>;

fn bounded_store() -> TestStore {
    CacheStore::new(CacheConfig::default().with_max_size(TEST_MAX_SIZE))
}

// == Strategies ==
/// Small key space so puts, gets and removes collide often
fn key_strategy() -> impl Strategy<Value = String> {
    "[a-f]{1,2}"
}

/// Sizes that fit, plus some that exceed the per-entry limit
fn size_strategy() -> impl Strategy<Value = usize> {
    prop_oneof![
        9 => 0usize..=400,
        1 => 850usize..=1000,
    ]
}

#[derive(Debug, Clone)]
enum CacheOp {
    Put { key: String, size: usize },
    Get { key: String },
    Remove { key: String },
    Clear,
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        6 => (key_strategy(), size_strategy()).prop_map(|(key, size)| CacheOp::Put { key, size }),
        4 => key_strategy().prop_map(|key| CacheOp::Get { key }),
        2 => key_strategy().prop_map(|key| CacheOp::Remove { key }),
        1 => Just(CacheOp::Clear),
    ]
}

// == Reference Model ==
/// Straightforward LRU with the same thresholds, front = most recent.
#[derive(Debug, Default)]
struct Model {
    order: VecDeque<(String, usize)>,
    hits: u64,
    misses: u64,
}

impl Model {
    fn total(&self) -> usize {
        self.order.iter().map(|(_, s)| s).sum()
    }

    fn take(&mut self, key: &str) -> Option<usize> {
        let pos = self.order.iter().position(|(k, _)| k == key)?;
        self.order.remove(pos).map(|(_, s)| s)
    }

    fn put(&mut self, key: &str, size: usize) -> Option<Option<usize>> {
        if size > TEST_TARGET {
            return None;
        }
        let previous = self.take(key);
        self.order.push_front((key.to_string(), size));
        if self.total() >= TEST_TRIGGER {
            while self.total() > TEST_TARGET {
                self.order.pop_back();
            }
        }
        Some(previous)
    }

    fn get(&mut self, key: &str) -> Option<usize> {
        match self.take(key) {
            Some(size) => {
                self.hits += 1;
                self.order.push_front((key.to_string(), size));
                Some(size)
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    fn keys(&self) -> Vec<String> {
        self.order.iter().map(|(k, _)| k.clone()).collect()
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    // For any sequence of operations the store matches the reference model:
    // same return values, same contents in the same access order, same counters.
    #[test]
    fn prop_matches_reference_model(ops in prop::collection::vec(cache_op_strategy(), 1..80)) {
        let mut store = bounded_store();
        let mut model = Model::default();

        for op in ops {
            match op {
                CacheOp::Put { key, size } => {
                    let outcome = store.put(key.clone(), size);
                    match model.put(&key, size) {
                        Some(previous) => {
                            prop_assert_eq!(outcome, PutOutcome::Inserted { previous });
                        }
                        None => prop_assert_eq!(outcome, PutOutcome::Rejected(size)),
                    }
                }
                CacheOp::Get { key } => {
                    prop_assert_eq!(store.get(&key).copied(), model.get(&key));
                }
                CacheOp::Remove { key } => {
                    prop_assert_eq!(store.remove(&key), model.take(&key));
                }
                CacheOp::Clear => {
                    store.clear();
                    model = Model::default();
                }
            }

            store.check_invariants();
            prop_assert_eq!(store.cache_size(), model.total());
            prop_assert_eq!(store.cache_hits(), model.hits);
            prop_assert_eq!(store.cache_misses(), model.misses);
        }

        let keys: Vec<String> = store.key_set().into_iter().collect();
        prop_assert_eq!(keys, model.keys());
    }

    // After any put the estimated size stays under the culling trigger.
    #[test]
    fn prop_size_stays_below_trigger(
        entries in prop::collection::vec((key_strategy(), size_strategy()), 1..100)
    ) {
        let mut store = bounded_store();

        for (key, size) in entries {
            store.put(key, size);
            prop_assert!(
                store.cache_size() < TEST_TRIGGER,
                "Cache size {} reached the trigger {}",
                store.cache_size(),
                TEST_TRIGGER
            );
        }
    }

    // Storing a value and reading it back returns the same value.
    #[test]
    fn prop_roundtrip_storage(key in key_strategy(), size in 0usize..=TEST_TARGET) {
        let mut store = bounded_store();

        store.put(key.clone(), size);
        prop_assert_eq!(store.get(&key), Some(&size));
    }

    // Removing twice yields the value, then nothing.
    #[test]
    fn prop_remove_twice(key in key_strategy(), size in 0usize..=TEST_TARGET) {
        let mut store = bounded_store();

        store.put(key.clone(), size);
        prop_assert_eq!(store.remove(&key), Some(size));
        prop_assert_eq!(store.remove(&key), None);
        prop_assert!(store.is_empty());
    }

    // An oversized put leaves contents and size exactly as they were.
    #[test]
    fn prop_oversized_put_is_noop(
        entries in prop::collection::vec((key_strategy(), 0usize..=300), 0..10),
        key in key_strategy(),
        size in (TEST_TARGET + 1)..(TEST_MAX_SIZE * 2)
    ) {
        let mut store = bounded_store();
        store.put_all(entries);

        let before_entries = store.entry_set();
        let before_size = store.cache_size();

        prop_assert!(store.put(key, size).is_rejected());
        prop_assert_eq!(store.cache_size(), before_size);
        prop_assert_eq!(store.entry_set(), before_entries);
    }

    // A key touched by get outlives untouched keys under eviction pressure.
    #[test]
    fn prop_lru_access_tracking(touched in 0usize..3) {
        let mut store = bounded_store();
        let keys = ["k0", "k1", "k2"];
        for key in keys {
            store.put(key.to_string(), 300);
        }

        store.get(keys[touched]);
        store.put("new".to_string(), 300);

        prop_assert!(store.contains_key(keys[touched]));
        prop_assert!(store.contains_key("new"));
        prop_assert_eq!(store.len(), 3);
    }
}
