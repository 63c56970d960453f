//! Cache Module
//!
//! Provides an in-process cache with byte-size LRU culling and TTL expiration.

mod entry;
mod list;
mod shared;
mod size;
mod stats;
mod store;
mod views;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use list::{AccessList, AgeList, KeyList, NodeHandle};
pub use shared::Cache;
pub use size::{DeepSizeEstimator, EstimateWith, JsonSizeEstimator, SizeEstimator};
pub use stats::CacheStats;
pub use store::{CacheStore, PutOutcome};
pub use views::{EntrySet, KeySet, Values};

pub use deepsize::DeepSizeOf;

// == Public Constants ==
/// Culling starts once the cache reaches this share of its maximum size
pub const CULL_TRIGGER_PERCENT: u8 = 97;

/// Culling stops at this share of the maximum size; larger values are rejected
pub const CULL_TARGET_PERCENT: u8 = 90;

/// Size charged when the estimator fails
pub const DEFAULT_ENTRY_SIZE: usize = 1;
