//! Least Recently Used (LRU) Cache Implementation
//!
//! An LRU cache evicts the least recently accessed item when capacity is
//! reached. This implementation provides O(1) time complexity for all
//! operations using a hash map combined with a doubly-linked list.
//!
//! # How the Algorithm Works
//!
//! LRU relies on **temporal locality**: items accessed recently are likely
//! to be accessed again soon. The cache keeps items ordered by their last
//! access.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                        LRU Cache                                │
//! │                                                                 │
//! │  HashMap<K, *Node>          Doubly-Linked List                  │
//! │  ┌──────────────┐          ┌──────────────────────────────┐     │
//! │  │ "apple" ──────────────▶ │ MRU ◀──▶ ... ◀──▶ LRU        │     │
//! │  │ "banana" ─────────────▶ │  ▲                    │      │     │
//! │  │ "cherry" ─────────────▶ │  │                    ▼      │     │
//! │  └──────────────┘          │ head               tail      │     │
//! │                            └──────────────────────────────┘     │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **HashMap**: O(1) key lookup, storing pointers to list nodes
//! - **Doubly-Linked List**: access order, most recent at the head
//!
//! ## Eviction Example
//!
//! ```text
//! Cache capacity: 3
//!
//! put("a", 1)  →  [a]
//! put("b", 2)  →  [b, a]
//! put("c", 3)  →  [c, b, a]
//! get("a")     →  [a, c, b]       // "a" moved to front (MRU)
//! put("d", 4)  →  [d, a, c]       // "b" evicted (was LRU)
//! ```
//!
//! # When to Use LRU
//!
//! **Good for:** general-purpose caching with temporal locality.
//!
//! **Not ideal for:** frequency-skewed workloads (use
//! [`LfuCache`](crate::LfuCache)), one-shot scans that displace hot data
//! (use [`LruKCache`](crate::LruKCache)), or phase-shifting workloads (use
//! [`ArcCache`](crate::ArcCache)).
//!
//! # Thread Safety
//!
//! `LruCache` is **not thread-safe**. For concurrent access, wrap it in a
//! `Mutex`, or use `ShardedLruCache` (requires the `concurrent` feature).

use crate::config::LruCacheConfig;
use crate::entry::CacheEntry;
use crate::list::{List, Node};
use crate::metrics::{CacheMetrics, LruCacheMetrics};
use crate::policy::CachePolicy;
use alloc::collections::BTreeMap;
use alloc::string::String;
use core::borrow::Borrow;
use core::hash::{BuildHasher, Hash};
use core::mem;

#[cfg(feature = "hashbrown")]
use hashbrown::DefaultHashBuilder;
#[cfg(feature = "hashbrown")]
use hashbrown::HashMap;

#[cfg(not(feature = "hashbrown"))]
use std::collections::hash_map::RandomState as DefaultHashBuilder;
#[cfg(not(feature = "hashbrown"))]
use std::collections::HashMap;

/// Internal LRU core containing the actual cache algorithm.
///
/// Shared between `LruCache` (single-threaded) and `ShardedLruCache`
/// (one core per shard). All algorithm logic lives here.
///
/// # Safety
///
/// The `map` field holds raw pointers into `list`. A pointer stays valid
/// as long as the node it names is linked into the list and the core has
/// not been dropped; every mutation below maintains that pairing.
pub(crate) struct LruSegment<K, V, S = DefaultHashBuilder> {
    /// Maximum number of resident entries. 0 disables the cache.
    capacity: usize,
    /// Recency list, MRU at the front.
    list: List<CacheEntry<K, V>>,
    /// Key -> node lookup. The node owns the entry; the map holds a handle.
    map: HashMap<K, *mut Node<CacheEntry<K, V>>, S>,
    metrics: LruCacheMetrics,
}

// SAFETY: LruSegment owns all data; the raw pointers point only at nodes
// owned by `list`, so sending the whole segment moves them together.
unsafe impl<K: Send, V: Send, S: Send> Send for LruSegment<K, V, S> {}

// SAFETY: All mutation requires &mut self; shared references cannot race.
unsafe impl<K: Send, V: Send, S: Sync> Sync for LruSegment<K, V, S> {}

impl<K: Hash + Eq, V, S: BuildHasher> LruSegment<K, V, S> {
    pub(crate) fn init(config: LruCacheConfig, hasher: S) -> Self {
        LruSegment {
            capacity: config.capacity,
            list: List::new(),
            map: HashMap::with_capacity_and_hasher(config.capacity, hasher),
            metrics: LruCacheMetrics::new(),
        }
    }

    #[inline]
    pub(crate) fn cap(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.map.len()
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    #[inline]
    pub(crate) fn metrics(&self) -> &LruCacheMetrics {
        &self.metrics
    }

    #[inline]
    pub(crate) fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.map.contains_key(key)
    }

    pub(crate) fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        if let Some(&node) = self.map.get(key) {
            // SAFETY: node comes from our map, so it is linked into `list`.
            unsafe {
                self.list.move_to_front(node);
                self.metrics.core.record_hit();
                Some(&(*node).value().value)
            }
        } else {
            self.metrics.core.record_miss();
            None
        }
    }

    pub(crate) fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        if let Some(&node) = self.map.get(key) {
            // SAFETY: node comes from our map, so it is linked into `list`.
            unsafe {
                self.list.move_to_front(node);
                self.metrics.core.record_hit();
                Some(&mut (*node).value_mut().value)
            }
        } else {
            self.metrics.core.record_miss();
            None
        }
    }

    /// Inserts or updates a key, returning the displaced pair:
    /// the previous binding on an update, or the evicted LRU entry when the
    /// insert happened at capacity.
    pub(crate) fn put(&mut self, key: K, value: V) -> Option<(K, V)>
    where
        K: Clone,
    {
        if self.capacity == 0 {
            return None;
        }

        if let Some(&node) = self.map.get(&key) {
            // SAFETY: node comes from our map, so it is linked into `list`.
            unsafe {
                self.list.move_to_front(node);
                let entry = (*node).value_mut();
                let old_key = mem::replace(&mut entry.key, key);
                let old_value = mem::replace(&mut entry.value, value);
                return Some((old_key, old_value));
            }
        }

        let mut evicted = None;
        while self.map.len() >= self.capacity {
            match self.evict_lru() {
                Some(pair) => evicted = Some(pair),
                None => break,
            }
        }

        let node = self.list.push_front(CacheEntry::new(key.clone(), value));
        self.map.insert(key, node);
        self.metrics.core.record_insertion();

        evicted
    }

    /// Removes the entry at the LRU end of the list.
    fn evict_lru(&mut self) -> Option<(K, V)> {
        let node = self.list.pop_back()?;
        // SAFETY: pop_back never yields a sigil node.
        let entry = unsafe { node.into_value() };
        self.map.remove(&entry.key);
        self.metrics.core.record_eviction();
        Some(entry.into_pair())
    }

    pub(crate) fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let node = self.map.remove(key)?;
        // SAFETY: node came from our map, so it is linked into `list`.
        let entry = unsafe { self.list.unlink(node).into_value() };
        Some(entry.value)
    }

    pub(crate) fn clear(&mut self) {
        self.map.clear();
        self.list.clear();
    }
}

impl<K, V, S> core::fmt::Debug for LruSegment<K, V, S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LruSegment")
            .field("capacity", &self.capacity)
            .field("len", &self.map.len())
            .finish()
    }
}

/// A Least Recently Used (LRU) cache with O(1) operations.
///
/// Maintains items in order of access recency. When capacity is reached,
/// the least recently accessed item is evicted to make room.
///
/// # Type Parameters
///
/// - `K`: Key type, `Hash + Eq` (`Clone` for insertion).
/// - `V`: Value type.
/// - `S`: Hash builder, defaults to `DefaultHashBuilder`.
///
/// # Example
///
/// ```
/// use cachekit::LruCache;
/// use cachekit::config::LruCacheConfig;
///
/// let mut cache = LruCache::init(LruCacheConfig::new(2), None);
///
/// cache.put("apple", 1);
/// cache.put("banana", 2);
/// assert_eq!(cache.get(&"apple"), Some(&1));
///
/// // "banana" is now LRU, so it gets evicted
/// cache.put("cherry", 3);
/// assert_eq!(cache.get(&"banana"), None);
/// ```
#[derive(Debug)]
pub struct LruCache<K, V, S = DefaultHashBuilder> {
    segment: LruSegment<K, V, S>,
}

impl<K: Hash + Eq, V> LruCache<K, V> {
    /// Creates a new LRU cache from a configuration with an optional hasher.
    ///
    /// # Example
    ///
    /// ```
    /// use cachekit::LruCache;
    /// use cachekit::config::LruCacheConfig;
    ///
    /// let mut cache: LruCache<&str, i32> = LruCache::init(LruCacheConfig::new(100), None);
    /// cache.put("key", 42);
    /// ```
    pub fn init(
        config: LruCacheConfig,
        hasher: Option<DefaultHashBuilder>,
    ) -> LruCache<K, V, DefaultHashBuilder> {
        LruCache {
            segment: LruSegment::init(config, hasher.unwrap_or_default()),
        }
    }
}

impl<K: Hash + Eq, V, S: BuildHasher> LruCache<K, V, S> {
    /// Returns the maximum number of entries the cache can hold.
    #[inline]
    pub fn cap(&self) -> usize {
        self.segment.cap()
    }

    /// Returns the current number of entries in the cache.
    #[inline]
    pub fn len(&self) -> usize {
        self.segment.len()
    }

    /// Returns `true` if the cache contains no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.segment.is_empty()
    }

    /// Returns `true` if `key` is resident, without touching recency.
    #[inline]
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.segment.contains(key)
    }

    /// Retrieves a reference to the value for the given key.
    ///
    /// On a hit the entry moves to the most-recently-used position.
    #[inline]
    pub fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.segment.get(key)
    }

    /// Retrieves a mutable reference to the value for the given key.
    ///
    /// On a hit the entry moves to the MRU position.
    #[inline]
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.segment.get_mut(key)
    }
}

impl<K: Hash + Eq + Clone, V, S: BuildHasher> LruCache<K, V, S> {
    /// Inserts a key-value pair into the cache.
    ///
    /// If the key already exists, the value is updated and the entry moves
    /// to the MRU position. If the cache is at capacity, the least recently
    /// used entry is evicted.
    ///
    /// # Returns
    ///
    /// - `Some((old_key, old_value))` if the key existed or an entry was evicted
    /// - `None` if this was a new insertion with available capacity
    ///
    /// # Example
    ///
    /// ```
    /// use cachekit::LruCache;
    /// use cachekit::config::LruCacheConfig;
    ///
    /// let mut cache = LruCache::init(LruCacheConfig::new(2), None);
    ///
    /// assert_eq!(cache.put("a", 1), None);            // New entry
    /// assert_eq!(cache.put("b", 2), None);            // New entry
    /// assert_eq!(cache.put("a", 10), Some(("a", 1))); // Update existing
    /// assert_eq!(cache.put("c", 3), Some(("b", 2)));  // Evicts "b"
    /// ```
    #[inline]
    pub fn put(&mut self, key: K, value: V) -> Option<(K, V)> {
        self.segment.put(key, value)
    }

    /// Removes a key from the cache, returning the value if it was present.
    #[inline]
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.segment.remove(key)
    }

    /// Removes all entries from the cache.
    #[inline]
    pub fn clear(&mut self) {
        self.segment.clear()
    }
}

impl<K: Hash + Eq + Clone, V: Clone, S: BuildHasher> CachePolicy<K, V> for LruCache<K, V, S> {
    fn put(&mut self, key: K, value: V) {
        self.segment.put(key, value);
    }

    fn get(&mut self, key: &K) -> Option<V> {
        self.segment.get(key).cloned()
    }

    fn contains(&self, key: &K) -> bool {
        self.segment.contains(key)
    }

    fn len(&self) -> usize {
        self.segment.len()
    }

    fn capacity(&self) -> usize {
        self.segment.cap()
    }
}

impl<K: Hash + Eq, V, S: BuildHasher> CacheMetrics for LruCache<K, V, S> {
    fn metrics(&self) -> BTreeMap<String, f64> {
        self.segment.metrics().metrics()
    }

    fn algorithm_name(&self) -> &'static str {
        self.segment.metrics().algorithm_name()
    }
}
