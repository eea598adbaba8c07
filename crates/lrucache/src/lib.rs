//! # lrucache
//!
//! Fixed-capacity key-value cache with Least-Recently-Used eviction.
//!
//! ## Architecture
//! - **Lookup index**: AHash map from key to node handle (O(1))
//! - **Recency list**: arena-backed doubly-linked list with head/tail
//!   sentinels, most-recently used first (O(1) promote and evict)
//! - **Cache**: keeps both in lockstep and evicts the list tail when a new
//!   key would exceed capacity
//!
//! Single-threaded; wrap in a lock for shared access.
//!
//! ```
//! use lrucache::LruCache;
//!
//! let mut cache = LruCache::new(2)?;
//! cache.put(1, "one");
//! cache.put(2, "two");
//! cache.get(&1);
//! cache.put(3, "three"); // evicts 2
//!
//! assert_eq!(cache.get(&2), None);
//! assert_eq!(cache.get(&1), Some(&"one"));
//! # Ok::<(), lrucache::Error>(())
//! ```

#![warn(missing_docs)]

mod error;
mod index;
mod list;
mod lru;
mod stats;

pub use error::{Error, Result};
pub use list::Iter;
pub use lru::LruCache;
pub use stats::CacheStats;
