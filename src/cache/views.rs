//! Snapshot Views
//!
//! Read-only copies of the cache's keys, values and entries. They are taken
//! under the cache lock and never reflect later mutations. None of them
//! exposes a mutating method.

use std::slice;
use std::vec;

macro_rules! snapshot_view {
    ($(#[$meta:meta])* $name:ident<$($g:ident),+>, $item:ty) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq)]
        pub struct $name<$($g),+> {
            items: Vec<$item>,
        }

        impl<$($g),+> $name<$($g),+> {
            pub(crate) fn new(items: Vec<$item>) -> Self {
                Self { items }
            }

            pub fn len(&self) -> usize {
                self.items.len()
            }

            pub fn is_empty(&self) -> bool {
                self.items.is_empty()
            }

            /// Iterates in access order, most recently used first.
            pub fn iter(&self) -> slice::Iter<'_, $item> {
                self.items.iter()
            }
        }

        impl<$($g),+> IntoIterator for $name<$($g),+> {
            type Item = $item;
            type IntoIter = vec::IntoIter<$item>;

            fn into_iter(self) -> Self::IntoIter {
                self.items.into_iter()
            }
        }

        impl<'a, $($g),+> IntoIterator for &'a $name<$($g),+> {
            type Item = &'a $item;
            type IntoIter = slice::Iter<'a, $item>;

            fn into_iter(self) -> Self::IntoIter {
                self.items.iter()
            }
        }
    };
}

snapshot_view!(
    /// Snapshot of the keys present when it was taken.
    KeySet<K>,
    K
);

snapshot_view!(
    /// Snapshot of the values present when it was taken.
    Values<V>,
    V
);

snapshot_view!(
    /// Snapshot of the key-value pairs present when it was taken.
    EntrySet<K, V>,
    (K, V)
);

impl<K: PartialEq> KeySet<K> {
    pub fn contains(&self, key: &K) -> bool {
        self.items.iter().any(|k| k == key)
    }
}

impl<V: PartialEq> Values<V> {
    pub fn contains(&self, value: &V) -> bool {
        self.items.iter().any(|v| v == value)
    }

    /// True when every value in `other` is also in this view.
    pub fn contains_all<'a>(&self, other: impl IntoIterator<Item = &'a V>) -> bool
    where
        V: 'a,
    {
        other.into_iter().all(|v| self.contains(v))
    }
}

impl<K: PartialEq, V> EntrySet<K, V> {
    /// Value recorded for `key` in this snapshot.
    pub fn get(&self, key: &K) -> Option<&V> {
        self.items.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_set() {
        let keys = KeySet::new(vec!["a", "b"]);
        assert_eq!(keys.len(), 2);
        assert!(keys.contains(&"a"));
        assert!(!keys.contains(&"z"));
        assert_eq!(keys.iter().copied().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn test_values_contains_all() {
        let values = Values::new(vec![1, 2, 3]);
        assert!(values.contains_all(&[1, 3]));
        assert!(!values.contains_all(&[1, 4]));
    }

    #[test]
    fn test_values_with_empty_marker() {
        let values = Values::new(vec![Some(1), None]);
        assert!(values.contains(&None));
    }

    #[test]
    fn test_entry_set_get() {
        let entries = EntrySet::new(vec![("a", 1), ("b", 2)]);
        assert_eq!(entries.get(&"b"), Some(&2));
        assert_eq!(entries.get(&"c"), None);
    }

    #[test]
    fn test_exhausted_iterator_yields_none() {
        let values = Values::new(vec![7]);
        let mut iter = values.into_iter();
        assert_eq!(iter.next(), Some(7));
        assert_eq!(iter.next(), None);
        assert_eq!(iter.next(), None);
    }

    #[test]
    fn test_empty_views() {
        let keys: KeySet<String> = KeySet::new(Vec::new());
        assert!(keys.is_empty());
        assert_eq!((&keys).into_iter().count(), 0);
    }
}
