//! Cache Entry Module
//!
//! Defines the wrapper stored in the entry map for each cached value.

use super::list::NodeHandle;

// == Cache Entry ==
/// A cached value plus its bookkeeping.
///
/// The two handles point into the access list and the age list. They are
/// lookups only; the lists own their nodes.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The stored value
    pub value: V,
    /// Estimated footprint in bytes, computed once on insertion
    pub size: usize,
    /// Node in the access-order list, moved to the front on every hit
    pub(crate) access_node: NodeHandle,
    /// Node in the age-order list, used to unlink on removal
    pub(crate) age_node: NodeHandle,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    pub(crate) fn new(
        value: V,
        size: usize,
        access_node: NodeHandle,
        age_node: NodeHandle,
    ) -> Self {
        Self {
            value,
            size,
            access_node,
            age_node,
        }
    }
}
