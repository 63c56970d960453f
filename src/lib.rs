//! Sized Cache - an in-process key-value cache
//!
//! Evicts least recently used entries under a byte-size budget and expires
//! entries after a maximum lifetime. Expiration is lazy: it happens at the
//! start of lookups and size queries, never on a timer.

pub mod cache;
pub mod config;
pub mod error;

pub use cache::{Cache, CacheStats, CacheStore, PutOutcome};
pub use config::CacheConfig;
pub use error::{CacheError, Result};
