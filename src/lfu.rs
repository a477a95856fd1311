//! Least Frequently Used (LFU) Cache Implementation
//!
//! An LFU cache evicts the least frequently accessed item when capacity is
//! reached. Items are organized into frequency buckets: a hash map provides
//! O(1) key lookup, and a `BTreeMap` keyed by access count holds one recency
//! list per count.
//!
//! # How the Algorithm Works
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────────┐
//! │                              LFU Cache                                      │
//! │                                                                             │
//! │  HashMap<K, *Node>              BTreeMap<count, List>                       │
//! │  ┌──────────────┐              ┌─────────────────────────────────────────┐  │
//! │  │ "hot" ──────────────────────│ count=10: [hot] ◀──▶ [warm]             │  │
//! │  │ "warm" ─────────────────────│ count=5:  [item_a] ◀──▶ [item_b]        │  │
//! │  │ "cold" ─────────────────────│ count=1:  [cold] ◀──▶ [new_item] ← LFU  │  │
//! │  └──────────────┘              └─────────────────────────────────────────┘  │
//! │                                        ▲                                    │
//! │                                   min_freq = 1                              │
//! └─────────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Within a bucket, nodes are ordered by arrival into that frequency level:
//! a promoted or inserted node appends at the back, and eviction takes the
//! front of the `min_freq` bucket — the oldest arrival at the lowest count.
//!
//! ## Access Pattern Example
//!
//! ```text
//! Cache capacity: 3
//!
//! put("a", 1)  →  count_1: [a]
//! put("b", 2)  →  count_1: [a, b]
//! put("c", 3)  →  count_1: [a, b, c]
//! get("a")     →  count_1: [b, c], count_2: [a]
//! get("a")     →  count_1: [b, c], count_3: [a]
//! put("d", 4)  →  count_1: [c, d], count_3: [a]   // "b" evicted
//! ```
//!
//! # Aging Decay
//!
//! Pure LFU suffers from cache pollution: entries popular long ago keep
//! counts no newcomer can reach. With a non-zero `max_avg_freq`, the cache
//! watches the mean access count; once it exceeds the threshold, every
//! count is halved (floor, minimum 1) and the buckets are rebuilt in place.
//! The rebuild moves nodes without reallocating them, so the index stays
//! untouched. The O(n) cost is amortized over the accesses that raised the
//! average.
//!
//! # Thread Safety
//!
//! `LfuCache` is **not thread-safe**. Wrap it in a `Mutex`, or use
//! `ShardedLfuCache` (requires the `concurrent` feature).
//!
//! # Examples
//!
//! ```
//! use cachekit::LfuCache;
//! use cachekit::config::LfuCacheConfig;
//!
//! let mut cache = LfuCache::init(LfuCacheConfig::new(3), None);
//!
//! cache.put("a", 1);
//! cache.put("b", 2);
//! cache.put("c", 3);
//!
//! // Raise "a"'s count
//! cache.get(&"a");
//! cache.get(&"a");
//!
//! cache.put("d", 4);  // evicts "b": lowest count, oldest arrival
//! assert_eq!(cache.get(&"b"), None);
//! assert_eq!(cache.get(&"a"), Some(&1));
//! ```

use crate::config::LfuCacheConfig;
use crate::entry::CacheEntry;
use crate::list::{List, Node};
use crate::meta::LfuMeta;
use crate::metrics::{CacheMetrics, LfuCacheMetrics};
use crate::policy::CachePolicy;
use alloc::boxed::Box;
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

/// Internal LFU core containing the actual cache algorithm.
///
/// Shared between `LfuCache` (single-threaded) and `ShardedLfuCache`
/// (one core per shard).
///
/// # Safety
///
/// The `map` field holds raw pointers at nodes owned by the bucket lists.
/// Promotion and decay splice nodes between lists without reallocating
/// them, so a pointer stays valid until its entry is evicted or removed.
pub(crate) struct LfuSegment<K, V, S = DefaultHashBuilder> {
    /// Maximum number of resident entries. 0 disables the cache.
    capacity: usize,
    /// Mean-count threshold for the halving decay. 0 disables decay.
    max_avg_freq: u32,
    /// Smallest key of a non-empty bucket, meaningful while entries exist.
    min_freq: u32,
    /// Sum of all resident access counts, maintained incrementally.
    total_freq: u64,
    /// Key -> node lookup. The bucket key for a node is `entry.meta.count`.
    map: HashMap<K, *mut Node<CacheEntry<K, V, LfuMeta>>, S>,
    /// Access count -> recency list. Empty buckets are pruned eagerly, so
    /// the first key is always the minimum frequency.
    buckets: BTreeMap<u32, List<CacheEntry<K, V, LfuMeta>>>,
    metrics: LfuCacheMetrics,
}

// SAFETY: LfuSegment owns all data; raw pointers point only at nodes owned
// by its bucket lists.
unsafe impl<K: Send, V: Send, S: Send> Send for LfuSegment<K, V, S> {}

// SAFETY: All mutation requires &mut self; shared references cannot race.
unsafe impl<K: Send, V: Send, S: Sync> Sync for LfuSegment<K, V, S> {}

impl<K: Hash + Eq, V, S: BuildHasher> LfuSegment<K, V, S> {
    pub(crate) fn init(config: LfuCacheConfig, hasher: S) -> Self {
        LfuSegment {
            capacity: config.capacity,
            max_avg_freq: config.max_avg_freq,
            min_freq: 1,
            total_freq: 0,
            map: HashMap::with_capacity_and_hasher(config.capacity, hasher),
            buckets: BTreeMap::new(),
            metrics: LfuCacheMetrics::new(),
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
    pub(crate) fn metrics(&self) -> &LfuCacheMetrics {
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

    /// Access count of a resident key, for tests and diagnostics.
    #[cfg(test)]
    pub(crate) fn count_of<Q>(&self, key: &Q) -> Option<u32>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let &node = self.map.get(key)?;
        // SAFETY: node comes from our map, so it is linked into a bucket.
        Some(unsafe { (*node).value().meta.count })
    }

    pub(crate) fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        if let Some(&node) = self.map.get(key) {
            // SAFETY: node comes from our map, so it is linked into the
            // bucket named by its access count.
            unsafe { self.promote(node) };
            self.metrics.core.record_hit();
            self.maybe_decay();
            // SAFETY: promotion and decay splice the node, never free it.
            unsafe { Some(&(*node).value().value) }
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
            // SAFETY: as in `get`.
            unsafe { self.promote(node) };
            self.metrics.core.record_hit();
            self.maybe_decay();
            // SAFETY: promotion and decay splice the node, never free it.
            unsafe { Some(&mut (*node).value_mut().value) }
        } else {
            self.metrics.core.record_miss();
            None
        }
    }

    /// Inserts or updates a key. A hit performs the same bucket promotion
    /// as `get`; an insert lands in bucket 1, evicting the head of the
    /// `min_freq` bucket when full. Returns the displaced pair, if any.
    pub(crate) fn put(&mut self, key: K, value: V) -> Option<(K, V)>
    where
        K: Clone,
    {
        if self.capacity == 0 {
            return None;
        }

        if let Some(&node) = self.map.get(&key) {
            // SAFETY: node comes from our map.
            unsafe {
                self.promote(node);
                let entry = (*node).value_mut();
                let old_key = mem::replace(&mut entry.key, key);
                let old_value = mem::replace(&mut entry.value, value);
                self.maybe_decay();
                return Some((old_key, old_value));
            }
        }

        let mut evicted = None;
        while self.map.len() >= self.capacity {
            match self.evict_lfu() {
                Some(pair) => evicted = Some(pair),
                None => break,
            }
        }

        let entry = CacheEntry::with_meta(key.clone(), value, LfuMeta::new(1));
        let node = self.buckets.entry(1).or_default().push_back(entry);
        self.map.insert(key, node);
        self.min_freq = 1;
        self.total_freq += 1;
        self.metrics.core.record_insertion();

        evicted
    }

    pub(crate) fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let node = self.map.remove(key)?;
        // SAFETY: node came from our map, linked in the bucket it names.
        let entry = unsafe {
            let count = (*node).value().meta.count;
            let bucket = match self.buckets.get_mut(&count) {
                Some(bucket) => bucket,
                None => unreachable!("bucket missing for resident count"),
            };
            bucket.unlink(node).into_value()
        };
        self.prune_bucket(entry.meta.count);
        self.refresh_min_freq();
        self.total_freq -= u64::from(entry.meta.count);
        Some(entry.value)
    }

    pub(crate) fn clear(&mut self) {
        self.map.clear();
        self.buckets.clear();
        self.min_freq = 1;
        self.total_freq = 0;
    }

    /// Moves a node from bucket `f` to the back of bucket `f + 1`.
    ///
    /// # Safety
    ///
    /// `node` must come from this segment's map.
    unsafe fn promote(&mut self, node: *mut Node<CacheEntry<K, V, LfuMeta>>) {
        // SAFETY: the node is linked, so its value is initialized.
        let count = unsafe { (*node).value().meta.count };

        let raw = {
            let bucket = match self.buckets.get_mut(&count) {
                Some(bucket) => bucket,
                None => unreachable!("bucket missing for resident count"),
            };
            // SAFETY: the node lives in the bucket named by its count.
            Box::into_raw(unsafe { bucket.unlink(node) })
        };
        self.prune_bucket(count);

        // SAFETY: raw is the node we just unlinked; it stays allocated.
        unsafe { (*raw).value_mut().meta.increment() };
        let target = self.buckets.entry(count + 1).or_default();
        // SAFETY: raw is currently unlinked.
        unsafe { target.attach_back(raw) };
        self.total_freq += 1;
        self.refresh_min_freq();
    }

    /// Evicts the oldest arrival in the minimum-frequency bucket.
    fn evict_lfu(&mut self) -> Option<(K, V)> {
        let node = self.buckets.get_mut(&self.min_freq)?.pop_front()?;
        // SAFETY: pop_front never yields a sigil node.
        let entry = unsafe { node.into_value() };
        self.prune_bucket(self.min_freq);
        self.refresh_min_freq();
        self.map.remove(&entry.key);
        self.total_freq -= u64::from(entry.meta.count);
        self.metrics.core.record_eviction();
        Some(entry.into_pair())
    }

    /// Drops bucket `count` if it emptied.
    fn prune_bucket(&mut self, count: u32) {
        if self.buckets.get(&count).is_some_and(List::is_empty) {
            self.buckets.remove(&count);
        }
    }

    /// Points `min_freq` at the smallest non-empty bucket. Empty buckets
    /// are pruned eagerly, so the first key is the answer.
    fn refresh_min_freq(&mut self) {
        self.min_freq = self.buckets.keys().next().copied().unwrap_or(1);
    }

    /// Halves every access count once the mean exceeds `max_avg_freq`.
    ///
    /// Rebuilds the buckets by splicing nodes into their halved slots,
    /// preserving within-bucket arrival order. Node addresses are stable,
    /// so the index needs no update.
    fn maybe_decay(&mut self) {
        if self.max_avg_freq == 0 || self.map.is_empty() {
            return;
        }
        if self.total_freq / self.map.len() as u64 <= u64::from(self.max_avg_freq) {
            return;
        }

        let old = mem::take(&mut self.buckets);
        let mut total = 0u64;
        for (_, mut bucket) in old {
            while let Some(node) = bucket.pop_front() {
                let raw = Box::into_raw(node);
                // SAFETY: raw was just popped, so it is valid and unlinked.
                unsafe {
                    let meta = &mut (*raw).value_mut().meta;
                    meta.halve();
                    total += u64::from(meta.count);
                    self.buckets.entry(meta.count).or_default().attach_back(raw);
                }
            }
        }
        self.total_freq = total;
        self.min_freq = self.buckets.keys().next().copied().unwrap_or(1);
        self.metrics.record_decay();
    }
}

impl<K, V, S> core::fmt::Debug for LfuSegment<K, V, S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LfuSegment")
            .field("capacity", &self.capacity)
            .field("len", &self.map.len())
            .field("min_freq", &self.min_freq)
            .field("total_freq", &self.total_freq)
            .finish()
    }
}

/// A Least Frequently Used (LFU) cache with O(1) operations and optional
/// aging decay.
///
/// Tracks an access count per entry and evicts the entry with the lowest
/// count; ties break toward the oldest arrival at that count. With a
/// non-zero `max_avg_freq` the cache halves every count whenever the mean
/// count exceeds the threshold, so formerly-hot entries cannot starve
/// newcomers forever.
///
/// # Examples
///
/// ```
/// use cachekit::LfuCache;
/// use cachekit::config::LfuCacheConfig;
///
/// let mut cache = LfuCache::init(LfuCacheConfig::new(2), None);
/// cache.put("rare", 1);
/// cache.put("popular", 2);
///
/// for _ in 0..10 {
///     cache.get(&"popular");
/// }
///
/// cache.put("new", 3);  // "rare" evicted (lowest count)
/// assert!(cache.get(&"popular").is_some());
/// assert!(cache.get(&"rare").is_none());
/// ```
#[derive(Debug)]
pub struct LfuCache<K, V, S = DefaultHashBuilder> {
    segment: LfuSegment<K, V, S>,
}

impl<K: Hash + Eq, V> LfuCache<K, V> {
    /// Creates a new LFU cache from a configuration with an optional hasher.
    ///
    /// # Example
    ///
    /// ```
    /// use cachekit::LfuCache;
    /// use cachekit::config::LfuCacheConfig;
    ///
    /// // Decay once the mean access count exceeds 8.
    /// let cache: LfuCache<u64, u64> =
    ///     LfuCache::init(LfuCacheConfig::with_decay(100, 8), None);
    /// ```
    pub fn init(
        config: LfuCacheConfig,
        hasher: Option<DefaultHashBuilder>,
    ) -> LfuCache<K, V, DefaultHashBuilder> {
        LfuCache {
            segment: LfuSegment::init(config, hasher.unwrap_or_default()),
        }
    }
}

impl<K: Hash + Eq, V, S: BuildHasher> LfuCache<K, V, S> {
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

    /// Returns `true` if `key` is resident, without touching its count.
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
    /// A hit increments the entry's access count and may trigger the aging
    /// decay.
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
    /// A hit increments the entry's access count and may trigger the aging
    /// decay.
    #[inline]
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.segment.get_mut(key)
    }
}

impl<K: Hash + Eq + Clone, V, S: BuildHasher> LfuCache<K, V, S> {
    /// Inserts a key-value pair into the cache.
    ///
    /// An existing key is overwritten and promoted exactly like a `get`
    /// hit. A new key enters with an access count of 1; if the cache is
    /// full, the oldest entry in the lowest-count bucket is evicted.
    ///
    /// Returns the displaced pair, if any.
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

impl<K: Hash + Eq + Clone, V: Clone, S: BuildHasher> CachePolicy<K, V> for LfuCache<K, V, S> {
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

impl<K: Hash + Eq, V, S: BuildHasher> CacheMetrics for LfuCache<K, V, S> {
    fn metrics(&self) -> BTreeMap<String, f64> {
        self.segment.metrics().metrics()
    }

    fn algorithm_name(&self) -> &'static str {
        self.segment.metrics().algorithm_name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_cache<K: Hash + Eq + Clone, V>(cap: usize) -> LfuCache<K, V> {
        LfuCache::init(LfuCacheConfig::new(cap), None)
    }

    fn make_decay_cache<K: Hash + Eq + Clone, V>(cap: usize, max_avg: u32) -> LfuCache<K, V> {
        LfuCache::init(LfuCacheConfig::with_decay(cap, max_avg), None)
    }

    #[test]
    fn test_lfu_basic_eviction() {
        let mut cache = make_cache(3);

        assert_eq!(cache.put("a", 1), None);
        assert_eq!(cache.put("b", 2), None);
        assert_eq!(cache.put("c", 3), None);

        cache.get(&"a");
        cache.get(&"a");
        cache.get(&"b");

        // "c" is the only count-1 entry left.
        let (evicted_key, evicted_val) = cache.put("d", 4).unwrap();
        assert_eq!(evicted_key, "c");
        assert_eq!(evicted_val, 3);

        assert_eq!(cache.get(&"a"), Some(&1));
        assert_eq!(cache.get(&"b"), Some(&2));
        assert_eq!(cache.get(&"d"), Some(&4));
        assert_eq!(cache.get(&"c"), None);
    }

    #[test]
    fn test_lfu_tie_breaks_toward_oldest_arrival() {
        let mut cache = make_cache(3);
        cache.put(1, "a");
        cache.put(2, "a");
        cache.put(3, "a");
        cache.get(&1);
        cache.get(&1);
        cache.get(&2);

        // 3 has the lowest count and is the oldest in its bucket.
        let evicted = cache.put(4, "a").unwrap();
        assert_eq!(evicted.0, 3);
    }

    #[test]
    fn test_lfu_frequency_ordering() {
        let mut cache = make_cache(2);

        cache.put("a", 1);
        cache.put("b", 2);

        cache.get(&"a");
        cache.get(&"a");
        cache.get(&"a");
        cache.get(&"b");

        let evicted = cache.put("c", 3).unwrap();
        assert_eq!(evicted.0, "b");

        assert_eq!(cache.get(&"a"), Some(&1));
        assert_eq!(cache.get(&"c"), Some(&3));
        assert_eq!(cache.get(&"b"), None);
    }

    #[test]
    fn test_lfu_update_preserves_count() {
        let mut cache = make_cache(2);

        cache.put("a", 1);
        cache.get(&"a");

        // Overwrite promotes like a hit: count rises, value replaced.
        let old = cache.put("a", 10).unwrap();
        assert_eq!(old.1, 1);
        assert_eq!(cache.segment.count_of(&"a"), Some(3));

        cache.put("b", 2);
        cache.put("c", 3); // evicts "b", the only count-1 entry

        assert_eq!(cache.get(&"a"), Some(&10));
        assert_eq!(cache.get(&"c"), Some(&3));
        assert_eq!(cache.get(&"b"), None);
    }

    #[test]
    fn test_lfu_decay_halves_counts() {
        let mut cache = make_decay_cache(3, 2);

        cache.put("a", 1);
        // Mean after each hit: counts sum / 1 entry. Five hits push the
        // mean past 2 and trigger halving.
        for _ in 0..5 {
            cache.get(&"a");
        }

        let metrics = cache.metrics();
        assert!(metrics.get("decay_runs").unwrap() > &0.0);
        // Count was halved at least once, so it is far below 6.
        assert!(cache.segment.count_of(&"a").unwrap() <= 3);
    }

    #[test]
    fn test_lfu_decay_lets_newcomers_compete() {
        let mut cache = make_decay_cache(3, 2);

        cache.put(1, "a");
        for _ in 0..5 {
            cache.get(&1);
        }
        cache.put(2, "b");
        cache.put(3, "c");
        cache.put(4, "d"); // evicts one of the count-1 newcomers

        // The dominator's count was halved, so a couple of accesses let a
        // newcomer overtake it.
        let dominator = cache.segment.count_of(&1).unwrap();
        cache.get(&4);
        cache.get(&4);
        cache.get(&4);
        let newcomer = cache.segment.count_of(&4);
        assert!(newcomer.is_some());
        assert!(newcomer.unwrap() + 1 >= dominator);
    }

    #[test]
    fn test_lfu_no_decay_when_disabled() {
        let mut cache = make_cache(2);
        cache.put("a", 1);
        for _ in 0..50 {
            cache.get(&"a");
        }
        assert_eq!(cache.segment.count_of(&"a"), Some(51));
        assert_eq!(cache.metrics().get("decay_runs").unwrap(), &0.0);
    }

    #[test]
    fn test_lfu_remove() {
        let mut cache = make_cache(3);

        cache.put("a", 1);
        cache.put("b", 2);
        cache.put("c", 3);

        assert_eq!(cache.remove(&"b"), Some(2));
        assert_eq!(cache.remove(&"b"), None);

        assert_eq!(cache.get(&"a"), Some(&1));
        assert_eq!(cache.get(&"c"), Some(&3));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_lfu_clear() {
        let mut cache = make_cache(3);

        cache.put("a", 1);
        cache.put("b", 2);
        cache.get(&"a");

        cache.clear();
        assert_eq!(cache.len(), 0);
        assert!(cache.is_empty());

        cache.put("d", 4);
        assert_eq!(cache.get(&"d"), Some(&4));
        assert_eq!(cache.segment.count_of(&"d"), Some(2));
    }

    #[test]
    fn test_lfu_zero_capacity_is_noop() {
        let mut cache = make_cache(0);
        assert_eq!(cache.put("a", 1), None);
        assert_eq!(cache.get(&"a"), None);
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn test_lfu_get_mut() {
        let mut cache = make_cache(2);

        cache.put("a", 1);
        if let Some(value) = cache.get_mut(&"a") {
            *value = 10;
        }
        assert_eq!(cache.get(&"a"), Some(&10));
        assert_eq!(cache.segment.count_of(&"a"), Some(3));
    }

    #[test]
    fn test_lfu_metrics() {
        let mut cache = make_cache(2);

        cache.put("a", 1);
        cache.put("b", 2);
        cache.get(&"a");
        cache.get(&"missing");
        cache.put("c", 3);

        let metrics = cache.metrics();
        assert_eq!(metrics.get("cache_hits").unwrap(), &1.0);
        assert_eq!(metrics.get("cache_misses").unwrap(), &1.0);
        assert_eq!(metrics.get("evictions").unwrap(), &1.0);
        assert_eq!(metrics.get("insertions").unwrap(), &3.0);
        assert_eq!(cache.algorithm_name(), "LFU");
    }

    #[test]
    fn test_lfu_index_and_buckets_stay_in_sync() {
        let mut cache = make_decay_cache(4, 2);
        for i in 0..128u32 {
            cache.put(i % 12, i);
            let _ = cache.get(&(i % 9));
            if i % 6 == 0 {
                let _ = cache.remove(&(i % 12));
            }
            let bucket_total: usize =
                cache.segment.buckets.values().map(super::List::len).sum();
            assert_eq!(cache.segment.map.len(), bucket_total);
            // Every bucket's key equals its members' counts is implied by
            // the promote path; at least assert no empty bucket lingers.
            assert!(cache.segment.buckets.values().all(|b| !b.is_empty()));
        }
    }

    #[test]
    fn test_lfu_concurrent_access() {
        extern crate std;
        use std::sync::{Arc, Mutex};
        use std::thread;
        use std::vec::Vec;

        let cache = Arc::new(Mutex::new(make_cache::<String, usize>(100)));
        let num_threads = 4;
        let ops_per_thread = 100;

        let mut handles: Vec<std::thread::JoinHandle<()>> = Vec::new();

        for t in 0..num_threads {
            let cache = Arc::clone(&cache);
            handles.push(thread::spawn(move || {
                for i in 0..ops_per_thread {
                    let key = std::format!("key_{}_{}", t, i);
                    let mut guard = cache.lock().unwrap();
                    guard.put(key.clone(), i);
                    if i % 3 == 0 {
                        let _ = guard.get(&key);
                        let _ = guard.get(&key);
                    }
                }
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }

        let mut guard = cache.lock().unwrap();
        assert!(guard.len() <= 100);
        guard.clear();
    }
}
