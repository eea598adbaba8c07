//! LRU (Least Recently Used) cache implementation
//!
//! Combines a [`LookupIndex`] for O(1) key lookup with a [`RecencyList`]
//! for O(1) promotion and eviction. Both are only ever edited together, so
//! every indexed key has exactly one linked node and vice versa.

use std::fmt;
use std::hash::Hash;
use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::index::LookupIndex;
use crate::list::{Iter, NodeId, RecencyList};
use crate::stats::CacheStats;

/// LRU cache with fixed capacity
pub struct LruCache<K, V> {
    index: LookupIndex<K>,
    list: RecencyList<K, V>,
    capacity: usize,
    stats: CacheStats,
}

impl<K, V> LruCache<K, V>
where
    K: Hash + Eq + Clone,
{
    /// Create a new LRU cache holding at most `capacity` entries
    ///
    /// # Errors
    /// Returns [`Error::InvalidCapacity`] if `capacity` is 0.
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(Error::InvalidCapacity(capacity));
        }
        debug!(capacity, "created LRU cache");

        Ok(Self {
            index: LookupIndex::with_capacity(capacity),
            list: RecencyList::with_capacity(capacity),
            capacity,
            stats: CacheStats::new(),
        })
    }

    /// Get a value and mark it most-recently used
    pub fn get(&mut self, key: &K) -> Option<&V> {
        match self.index.get(key) {
            Some(id) => {
                self.stats.record_hit();
                self.list.move_to_front(id);
                Some(self.list.value(id))
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    /// Mutable access to a value, marking it most-recently used
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        match self.index.get(key) {
            Some(id) => {
                self.stats.record_hit();
                self.list.move_to_front(id);
                Some(self.list.value_mut(id))
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    /// Get a value without touching its recency
    pub fn peek(&self, key: &K) -> Option<&V> {
        self.index.get(key).map(|id| self.list.value(id))
    }

    /// Check whether `key` is resident, without touching its recency
    pub fn contains(&self, key: &K) -> bool {
        self.index.contains(key)
    }

    /// Insert or update a key-value pair
    ///
    /// The key becomes most-recently used. Inserting a new key into a full
    /// cache evicts the least-recently used entry.
    pub fn put(&mut self, key: K, value: V) {
        if let Some(id) = self.index.get(&key) {
            *self.list.value_mut(id) = value;
            self.list.move_to_front(id);
            self.stats.record_update();
            return;
        }

        let id = self.list.alloc(key.clone(), value);
        self.index.set(key, id);
        self.list.push_front(id);
        self.stats.record_insert();

        // Inserts arrive one at a time, so at most one entry is over.
        if self.list.len() > self.capacity {
            self.evict();
        }
    }

    /// Remove a key from the cache
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let id = self.index.get(key)?;
        let (_, value) = self.unlink(id);
        trace!(len = self.len(), "removed entry");
        Some(value)
    }

    /// Remove and return the least-recently used entry
    pub fn pop_lru(&mut self) -> Option<(K, V)> {
        let id = self.list.back()?;
        Some(self.unlink(id))
    }

    /// Least-recently used entry, without touching its recency
    pub fn peek_lru(&self) -> Option<(&K, &V)> {
        self.list.back().map(|id| self.list.entry(id))
    }

    /// Get the current size of the cache
    pub fn len(&self) -> usize {
        self.list.len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.list.len() == 0
    }

    /// Maximum number of resident entries
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Clear the cache (statistics are kept)
    pub fn clear(&mut self) {
        self.index.clear();
        self.list.clear();
    }

    /// Iterate entries from most- to least-recently used
    ///
    /// Iteration does not change recency.
    pub fn iter(&self) -> Iter<'_, K, V> {
        self.list.iter()
    }

    /// Get cache statistics
    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }

    fn evict(&mut self) {
        if self.pop_lru().is_some() {
            self.stats.record_eviction();
            trace!(capacity = self.capacity, "evicted least-recently used entry");
        }
    }

    /// Drop `id` from both structures and hand back its entry.
    ///
    /// The index is updated first since hashing is the only step that runs
    /// caller code; the list edits after it cannot fail.
    fn unlink(&mut self, id: NodeId) -> (K, V) {
        let (key, _) = self.list.entry(id);
        let removed = self.index.remove(key);
        assert_eq!(
            removed,
            Some(id),
            "lookup index and recency list disagree on a resident key"
        );

        self.list.remove(id);
        self.list.release(id)
    }
}

impl<K, V> fmt::Debug for LruCache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruCache")
            .field("capacity", &self.capacity)
            .field("len", &self.list.len())
            .field("stats", &self.stats)
            .finish()
    }
}

impl<'a, K, V> IntoIterator for &'a LruCache<K, V>
where
    K: Hash + Eq + Clone,
{
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
