//! Lookup index: key -> recency list handle
//!
//! Holds handles only. Entries are owned by the recency list, so a handle
//! must be dropped here in the same step its node is released there.

use std::collections::HashMap;
use std::hash::Hash;
use ahash::RandomState;

use crate::list::{NodeId, MAX_PREALLOC};

/// AHash-backed map from key to node handle
pub(crate) struct LookupIndex<K> {
    map: HashMap<K, NodeId, RandomState>,
}

impl<K> LookupIndex<K>
where
    K: Hash + Eq,
{
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            map: HashMap::with_capacity_and_hasher(
                capacity.min(MAX_PREALLOC) + 1,
                RandomState::new(),
            ),
        }
    }

    pub(crate) fn get(&self, key: &K) -> Option<NodeId> {
        self.map.get(key).copied()
    }

    /// Insert or overwrite the handle for `key`
    pub(crate) fn set(&mut self, key: K, id: NodeId) -> Option<NodeId> {
        self.map.insert(key, id)
    }

    pub(crate) fn remove(&mut self, key: &K) -> Option<NodeId> {
        self.map.remove(key)
    }

    pub(crate) fn contains(&self, key: &K) -> bool {
        self.map.contains_key(key)
    }

    pub(crate) fn len(&self) -> usize {
        self.map.len()
    }

    pub(crate) fn clear(&mut self) {
        self.map.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::list::RecencyList;

    #[test]
    fn test_index_set_get_remove() {
        let mut list = RecencyList::with_capacity(2);
        let mut index = LookupIndex::with_capacity(2);

        let a = list.alloc("a", 1);
        assert_eq!(index.set("a", a), None);

        assert_eq!(index.get(&"a"), Some(a));
        assert!(index.contains(&"a"));
        assert_eq!(index.len(), 1);

        assert_eq!(index.remove(&"a"), Some(a));
        assert_eq!(index.get(&"a"), None);
        assert_eq!(index.remove(&"a"), None);
    }

    #[test]
    fn test_index_overwrite() {
        let mut list = RecencyList::with_capacity(2);
        let mut index = LookupIndex::with_capacity(2);

        let a = list.alloc("k", 1);
        let b = list.alloc("k", 2);
        index.set("k", a);

        assert_eq!(index.set("k", b), Some(a));
        assert_eq!(index.get(&"k"), Some(b));
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_index_clear() {
        let mut list = RecencyList::with_capacity(2);
        let mut index = LookupIndex::with_capacity(2);

        for key in ["x", "y"] {
            let id = list.alloc(key, 0);
            index.set(key, id);
        }
        index.clear();

        assert_eq!(index.len(), 0);
        assert!(!index.contains(&"x"));
    }
}
