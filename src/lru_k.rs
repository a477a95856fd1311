//! k-Promotion LRU (LRU-k) Cache Implementation
//!
//! A two-stage LRU variant that resists one-shot scans. A key is admitted
//! into the main cache only after it has been accessed `k` times; until then
//! it lives in a bounded **history stage** that counts accesses and holds
//! any value a `put` supplied.
//!
//! # How the Algorithm Works
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────────┐
//! │                          LRU-k Cache                                 │
//! │                                                                      │
//! │   access ──▶ ┌─────────────────────┐   hits >= k   ┌─────────────┐   │
//! │              │   History stage     │ ────────────▶ │  Main LRU   │   │
//! │              │ (key, hits, staged) │   promote     │  (key, val) │   │
//! │              └─────────────────────┘               └─────────────┘   │
//! │                  LRU, capacity h                    LRU, capacity c  │
//! └──────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Both `get` and `put` on a non-resident key count as one history access.
//! A scan that touches each key once never reaches the main cache, so the
//! hot working set stays resident. With `k = 1` admission is immediate and
//! the cache behaves exactly like plain LRU.
//!
//! A value written by `put` before admission is *staged* in the history
//! entry: reads still see it, and it moves into the main cache wholesale
//! when the threshold is met. A key promoted with no staged value waits for
//! the next `put`. History overflow drops the least recently accessed
//! history entry, staged value included.
//!
//! # Thread Safety
//!
//! `LruKCache` is **not thread-safe**. Wrap it in a `Mutex` for concurrent
//! access.
//!
//! # Examples
//!
//! ```
//! use cachekit::LruKCache;
//! use cachekit::config::LruKCacheConfig;
//!
//! let mut cache = LruKCache::init(LruKCacheConfig::new(2, 4, 2), None);
//!
//! cache.put("hot", 1);            // staged, 1 access
//! assert_eq!(cache.get(&"hot"), Some(&1));  // 2nd access: admitted
//! assert_eq!(cache.len(), 1);
//!
//! cache.put("scan", 9);           // staged only, never admitted
//! assert_eq!(cache.len(), 1);
//! ```

use crate::config::LruKCacheConfig;
use crate::entry::CacheEntry;
use crate::list::{List, Node};
use crate::meta::HistoryMeta;
use crate::metrics::{CacheMetrics, LruKCacheMetrics};
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

/// A history-stage record: access count plus any staged value.
type HistoryEntry<K, V> = CacheEntry<K, HistoryMeta<V>>;

/// Internal LRU-k core containing the actual cache algorithm.
///
/// # Safety
///
/// Both maps hold raw pointers into their respective lists; every mutation
/// keeps map and list in lockstep, exactly as in `LruSegment`.
pub(crate) struct LruKSegment<K, V, S = DefaultHashBuilder> {
    /// Maximum number of resident entries in the main cache.
    capacity: usize,
    /// Maximum number of keys tracked in the history stage.
    history_capacity: usize,
    /// Accesses required before admission into the main cache.
    k: u32,
    /// Main recency list, MRU at the front.
    main_list: List<CacheEntry<K, V>>,
    main_map: HashMap<K, *mut Node<CacheEntry<K, V>>, S>,
    /// Pre-admission stage, most recently accessed at the front.
    history_list: List<HistoryEntry<K, V>>,
    history_map: HashMap<K, *mut Node<HistoryEntry<K, V>>, S>,
    metrics: LruKCacheMetrics,
}

// SAFETY: LruKSegment owns all data; raw pointers point only at nodes owned
// by its two lists.
unsafe impl<K: Send, V: Send, S: Send> Send for LruKSegment<K, V, S> {}

// SAFETY: All mutation requires &mut self; shared references cannot race.
unsafe impl<K: Send, V: Send, S: Sync> Sync for LruKSegment<K, V, S> {}

impl<K: Hash + Eq, V, S: BuildHasher + Default> LruKSegment<K, V, S> {
    pub(crate) fn init(config: LruKCacheConfig, hasher: S) -> Self {
        assert!(config.k >= 1, "admission threshold k must be >= 1");
        LruKSegment {
            capacity: config.capacity,
            history_capacity: config.history_capacity,
            k: config.k,
            main_list: List::new(),
            main_map: HashMap::with_capacity_and_hasher(config.capacity, hasher),
            history_list: List::new(),
            history_map: HashMap::with_capacity_and_hasher(
                config.history_capacity,
                S::default(),
            ),
            metrics: LruKCacheMetrics::new(),
        }
    }

    #[inline]
    pub(crate) fn cap(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.main_map.len()
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.main_map.is_empty()
    }

    /// Number of keys currently tracked in the history stage.
    #[inline]
    pub(crate) fn history_len(&self) -> usize {
        self.history_map.len()
    }

    #[inline]
    pub(crate) fn metrics(&self) -> &LruKCacheMetrics {
        &self.metrics
    }

    #[inline]
    pub(crate) fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.main_map.contains_key(key)
    }

    /// Looks up a key.
    ///
    /// Unlike the other cores this takes `&K`, not a borrowed form: a miss
    /// creates a history entry, which needs an owned key to index.
    pub(crate) fn get(&mut self, key: &K) -> Option<&V>
    where
        K: Clone,
    {
        if let Some(&node) = self.main_map.get(key) {
            // SAFETY: node comes from main_map, so it is linked in main_list.
            unsafe {
                self.main_list.move_to_front(node);
                self.metrics.core.record_hit();
                return Some(&(*node).value().value);
            }
        }

        if let Some(&node) = self.history_map.get(key) {
            // SAFETY: node comes from history_map, so it is linked in
            // history_list.
            unsafe {
                self.history_list.move_to_front(node);
                let meta = &mut (*node).value_mut().value;
                let hits = meta.touch();

                if meta.staged.is_none() {
                    // Seen before but never written: nothing to return.
                    self.metrics.core.record_miss();
                    return None;
                }
                self.metrics.core.record_hit();

                if hits >= self.k {
                    let entry = self.take_history(node);
                    // staged checked non-empty above
                    let value = match entry.value.staged {
                        Some(value) => value,
                        None => unreachable!(),
                    };
                    self.metrics.record_promotion();
                    let (admitted, _evicted) = self.admit(entry.key, value);
                    return Some(&(*admitted).value().value);
                }
                return (*node).value().value.staged.as_ref();
            }
        }

        self.metrics.core.record_miss();
        if self.k > 1 && self.capacity > 0 {
            self.stage_owned(key.clone(), None);
        }
        None
    }

    /// Inserts or updates a key. A key already resident behaves exactly like
    /// LRU; a non-resident key is staged in history and admitted once it has
    /// been accessed `k` times. Returns the displaced main-cache pair, if
    /// any.
    pub(crate) fn put(&mut self, key: K, value: V) -> Option<(K, V)>
    where
        K: Clone,
    {
        if self.capacity == 0 {
            return None;
        }

        if let Some(&node) = self.main_map.get(&key) {
            // SAFETY: node comes from main_map, so it is linked in main_list.
            unsafe {
                self.main_list.move_to_front(node);
                let entry = (*node).value_mut();
                let old_key = mem::replace(&mut entry.key, key);
                let old_value = mem::replace(&mut entry.value, value);
                return Some((old_key, old_value));
            }
        }

        if let Some(&node) = self.history_map.get(&key) {
            // SAFETY: node comes from history_map, so it is linked in
            // history_list.
            unsafe {
                self.history_list.move_to_front(node);
                let meta = &mut (*node).value_mut().value;
                let hits = meta.touch();
                meta.staged = Some(value);

                if hits >= self.k {
                    let entry = self.take_history(node);
                    let staged = match entry.value.staged {
                        Some(staged) => staged,
                        None => unreachable!(),
                    };
                    self.metrics.record_promotion();
                    let (_admitted, evicted) = self.admit(entry.key, staged);
                    return evicted;
                }
                return None;
            }
        }

        if self.k == 1 {
            // First access already meets the threshold.
            let (_admitted, evicted) = self.admit(key, value);
            return evicted;
        }

        self.stage_owned(key, Some(value));
        None
    }

    pub(crate) fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        if let Some(node) = self.main_map.remove(key) {
            // SAFETY: node came from main_map, so it is linked in main_list.
            let entry = unsafe { self.main_list.unlink(node).into_value() };
            return Some(entry.value);
        }
        if let Some(node) = self.history_map.remove(key) {
            // SAFETY: node came from history_map.
            let entry = unsafe { self.history_list.unlink(node).into_value() };
            return entry.value.staged;
        }
        None
    }

    pub(crate) fn clear(&mut self) {
        self.main_map.clear();
        self.main_list.clear();
        self.history_map.clear();
        self.history_list.clear();
    }

    /// Unlinks a history node and removes its index entry.
    ///
    /// # Safety (internal)
    ///
    /// `node` must come from `history_map`.
    fn take_history(&mut self, node: *mut Node<HistoryEntry<K, V>>) -> HistoryEntry<K, V> {
        // SAFETY: callers pass nodes obtained from history_map.
        let entry = unsafe { self.history_list.unlink(node).into_value() };
        self.history_map.remove(&entry.key);
        entry
    }

    /// Inserts directly into the main cache, evicting its LRU entry if full.
    fn admit(&mut self, key: K, value: V) -> (*mut Node<CacheEntry<K, V>>, Option<(K, V)>)
    where
        K: Clone,
    {
        let mut evicted = None;
        while self.main_map.len() >= self.capacity {
            match self.main_list.pop_back() {
                Some(node) => {
                    // SAFETY: pop_back never yields a sigil node.
                    let entry = unsafe { node.into_value() };
                    self.main_map.remove(&entry.key);
                    self.metrics.core.record_eviction();
                    evicted = Some(entry.into_pair());
                }
                None => break,
            }
        }

        let node = self
            .main_list
            .push_front(CacheEntry::new(key.clone(), value));
        self.main_map.insert(key, node);
        self.metrics.core.record_insertion();
        (node, evicted)
    }

    /// Creates a history entry for an owned key.
    fn stage_owned(&mut self, key: K, staged: Option<V>)
    where
        K: Clone,
    {
        if self.history_capacity == 0 {
            return;
        }
        let node = self
            .history_list
            .push_front(CacheEntry::new(key.clone(), HistoryMeta::new(staged)));
        self.history_map.insert(key, node);
        self.trim_history();
    }

    /// Evicts least-recently-accessed history entries past the stage bound.
    fn trim_history(&mut self) {
        while self.history_map.len() > self.history_capacity {
            match self.history_list.pop_back() {
                Some(node) => {
                    // SAFETY: pop_back never yields a sigil node.
                    let entry = unsafe { node.into_value() };
                    self.history_map.remove(&entry.key);
                    self.metrics.record_history_eviction();
                }
                None => break,
            }
        }
    }
}

impl<K, V, S> core::fmt::Debug for LruKSegment<K, V, S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LruKSegment")
            .field("capacity", &self.capacity)
            .field("history_capacity", &self.history_capacity)
            .field("k", &self.k)
            .field("len", &self.main_map.len())
            .field("history_len", &self.history_map.len())
            .finish()
    }
}

/// An LRU cache with k-promotion admission.
///
/// New keys must be accessed `k` times before they displace anything in the
/// main cache; until then they are tracked (and any written value staged) in
/// a bounded history stage. One-shot scans therefore cannot flush the
/// resident working set.
///
/// # Example
///
/// ```
/// use cachekit::LruKCache;
/// use cachekit::config::LruKCacheConfig;
///
/// let mut cache = LruKCache::init(LruKCacheConfig::new(2, 8, 2), None);
///
/// cache.put("a", 1);
/// cache.put("b", 2);
/// assert_eq!(cache.len(), 0);   // both still staged
///
/// cache.get(&"a");              // second access admits "a"
/// assert_eq!(cache.len(), 1);
/// assert!(cache.contains(&"a"));
/// ```
#[derive(Debug)]
pub struct LruKCache<K, V, S = DefaultHashBuilder> {
    segment: LruKSegment<K, V, S>,
}

impl<K: Hash + Eq, V> LruKCache<K, V> {
    /// Creates a new LRU-k cache from a configuration with an optional
    /// hasher.
    ///
    /// # Panics
    ///
    /// Panics if `config.k` is 0.
    pub fn init(
        config: LruKCacheConfig,
        hasher: Option<DefaultHashBuilder>,
    ) -> LruKCache<K, V, DefaultHashBuilder> {
        LruKCache {
            segment: LruKSegment::init(config, hasher.unwrap_or_default()),
        }
    }
}

impl<K: Hash + Eq, V, S: BuildHasher + Default> LruKCache<K, V, S> {
    /// Returns the maximum number of entries the main cache can hold.
    #[inline]
    pub fn cap(&self) -> usize {
        self.segment.cap()
    }

    /// Returns the current number of resident entries (main cache only).
    #[inline]
    pub fn len(&self) -> usize {
        self.segment.len()
    }

    /// Returns `true` if the main cache contains no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.segment.is_empty()
    }

    /// Returns the number of keys currently tracked in the history stage.
    #[inline]
    pub fn history_len(&self) -> usize {
        self.segment.history_len()
    }

    /// Returns `true` if `key` is resident in the main cache.
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
    /// Resident keys behave exactly like LRU. A staged key returns its
    /// staged value and may be admitted if this access meets the threshold;
    /// an unknown key records one history access and misses.
    #[inline]
    pub fn get(&mut self, key: &K) -> Option<&V>
    where
        K: Clone,
    {
        self.segment.get(key)
    }

    /// Removes a key, returning the resident or staged value if present.
    #[inline]
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.segment.remove(key)
    }

    /// Removes all entries, including the history stage.
    #[inline]
    pub fn clear(&mut self) {
        self.segment.clear()
    }
}

impl<K: Hash + Eq + Clone, V, S: BuildHasher + Default> LruKCache<K, V, S> {
    /// Inserts or updates a key.
    ///
    /// Resident keys are overwritten and moved to the MRU position. A
    /// non-resident key stages its value in history and is admitted once it
    /// has been accessed `k` times (this `put` counts as one access).
    ///
    /// Returns the pair displaced from the main cache, if any.
    #[inline]
    pub fn put(&mut self, key: K, value: V) -> Option<(K, V)> {
        self.segment.put(key, value)
    }
}

impl<K: Hash + Eq + Clone, V: Clone, S: BuildHasher + Default> CachePolicy<K, V>
    for LruKCache<K, V, S>
{
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

impl<K: Hash + Eq, V, S: BuildHasher + Default> CacheMetrics for LruKCache<K, V, S> {
    fn metrics(&self) -> BTreeMap<String, f64> {
        self.segment.metrics().metrics()
    }

    fn algorithm_name(&self) -> &'static str {
        self.segment.metrics().algorithm_name()
    }
}
