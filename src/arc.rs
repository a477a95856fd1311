//! Adaptive Replacement Cache (ARC) Implementation
//!
//! ARC balances recency and frequency at runtime. It splits residents
//! across two lists — T1 (seen once recently) and T2 (seen at least twice)
//! — and remembers recently evicted keys in two ghost lists, B1 and B2,
//! that hold no values. Hits on the ghost lists steer an adaptive target
//! `p`: a B1 hit means "we evicted too aggressively from the recency side"
//! and grows `p`; a B2 hit shrinks it.
//!
//! # Structure
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────────────┐
//! │                              ARC Cache                                 │
//! │                                                                        │
//! │        resident (values)                ghosts (keys only)             │
//! │  ┌──────────────────────────┐     ┌───────────────────────────┐        │
//! │  │ T1: seen once   [recency]│ ──▶ │ B1: evicted from T1       │        │
//! │  │ T2: seen twice+ [freq.]  │ ──▶ │ B2: evicted from T2       │        │
//! │  └──────────────────────────┘     └───────────────────────────┘        │
//! │        |T1| + |T2| <= c              |T1| + |B1| <= c                  │
//! │                                      total <= 2c                      │
//! │                                                                        │
//! │  p: target size of T1, 0 <= p <= c, tuned by ghost hits                │
//! └────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each list is MRU-at-front. The eviction primitive (`replace`) demotes
//! the LRU of T1 into B1 while T1 exceeds the target `p`, otherwise the
//! LRU of T2 into B2; demotion drops the value and keeps the key.
//!
//! # Access behavior
//!
//! - Hit in T1 or T2: promote to the MRU position of T2.
//! - `put` of a B1/B2 ghost: adapt `p`, run `replace`, revive the key at
//!   the MRU of T2 with the new value.
//! - `get` of a ghost key: adapt `p`, report a miss (there is no stored
//!   value to return).
//! - `put` of an unknown key: make room per the ARC case rules, insert at
//!   the MRU of T1.
//!
//! # Thread Safety
//!
//! `ArcCache` is **not thread-safe**. Wrap it in a `Mutex`, or use
//! `ShardedArcCache` (requires the `concurrent` feature).
//!
//! # Examples
//!
//! ```
//! use cachekit::ArcCache;
//! use cachekit::config::ArcCacheConfig;
//!
//! let mut cache = ArcCache::init(ArcCacheConfig::new(2), None);
//!
//! cache.put(1, "one");
//! cache.put(2, "two");
//! cache.get(&1);          // promotes 1 into T2
//! cache.put(3, "three");  // evicts from T1, key 2 becomes a B1 ghost
//!
//! assert_eq!(cache.get(&1), Some(&"one"));
//! assert_eq!(cache.get(&2), None);   // ghost: miss, but adapts p
//! ```

use crate::config::ArcCacheConfig;
use crate::entry::CacheEntry;
use crate::list::{List, Node};
use crate::metrics::{ArcCacheMetrics, CacheMetrics};
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

/// Which resident list an entry currently lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Residence {
    /// T1: seen once recently.
    Recent,
    /// T2: seen at least twice recently.
    Frequent,
}

/// Internal ARC core containing the actual cache algorithm.
///
/// Shared between `ArcCache` (single-threaded) and `ShardedArcCache`
/// (one core per shard).
///
/// # Safety
///
/// `map` holds raw pointers at nodes owned by `t1`/`t2`, tagged with the
/// list they live in; `b1_map`/`b2_map` hold pointers at nodes owned by
/// the ghost lists. Every transition below moves the index entry and the
/// node together.
pub(crate) struct ArcSegment<K, V, S = DefaultHashBuilder> {
    /// Maximum number of resident entries (|T1| + |T2|). 0 disables the
    /// cache.
    capacity: usize,
    /// Adaptive target size for T1, within `[0, capacity]`.
    p: usize,
    /// Resident index over T1 and T2.
    map: HashMap<K, (Residence, *mut Node<CacheEntry<K, V>>), S>,
    /// Residents seen once, MRU at the front.
    t1: List<CacheEntry<K, V>>,
    /// Residents seen at least twice, MRU at the front.
    t2: List<CacheEntry<K, V>>,
    /// Keys recently evicted from T1 (no values), MRU at the front.
    b1: List<K>,
    /// Keys recently evicted from T2 (no values), MRU at the front.
    b2: List<K>,
    /// Ghost index for B1.
    b1_map: HashMap<K, *mut Node<K>, S>,
    /// Ghost index for B2.
    b2_map: HashMap<K, *mut Node<K>, S>,
    metrics: ArcCacheMetrics,
}

// SAFETY: ArcSegment owns all data; raw pointers point only at nodes owned
// by its four lists.
unsafe impl<K: Send, V: Send, S: Send> Send for ArcSegment<K, V, S> {}

// SAFETY: All mutation requires &mut self; shared references cannot race.
unsafe impl<K: Send, V: Send, S: Sync> Sync for ArcSegment<K, V, S> {}

impl<K: Hash + Eq + Clone, V, S: BuildHasher + Default> ArcSegment<K, V, S> {
    pub(crate) fn init(config: ArcCacheConfig, hasher: S) -> Self {
        ArcSegment {
            capacity: config.capacity,
            p: 0,
            map: HashMap::with_capacity_and_hasher(config.capacity, hasher),
            t1: List::new(),
            t2: List::new(),
            b1: List::new(),
            b2: List::new(),
            b1_map: HashMap::with_capacity_and_hasher(config.capacity, S::default()),
            b2_map: HashMap::with_capacity_and_hasher(config.capacity, S::default()),
            metrics: ArcCacheMetrics::new(),
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
    pub(crate) fn metrics(&self) -> &ArcCacheMetrics {
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

    /// Current adaptive target size for T1.
    #[inline]
    pub(crate) fn target_recency(&self) -> usize {
        self.p
    }

    #[inline]
    pub(crate) fn recent_len(&self) -> usize {
        self.t1.len()
    }

    #[inline]
    pub(crate) fn frequent_len(&self) -> usize {
        self.t2.len()
    }

    #[inline]
    pub(crate) fn recent_ghost_len(&self) -> usize {
        self.b1.len()
    }

    #[inline]
    pub(crate) fn frequent_ghost_len(&self) -> usize {
        self.b2.len()
    }

    pub(crate) fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        if self.map.contains_key(key) {
            let node = self.touch_resident(key);
            self.metrics.core.record_hit();
            // SAFETY: touch_resident returns a node linked in T2.
            return Some(unsafe { &(*node).value().value });
        }

        // A ghost hit cannot serve a value, but it still teaches the cache
        // something about the workload.
        if self.b1_map.contains_key(key) {
            self.adapt_toward_recency();
        } else if self.b2_map.contains_key(key) {
            self.adapt_toward_frequency();
        }
        self.metrics.core.record_miss();
        None
    }

    pub(crate) fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        if self.map.contains_key(key) {
            let node = self.touch_resident(key);
            self.metrics.core.record_hit();
            // SAFETY: touch_resident returns a node linked in T2.
            return Some(unsafe { &mut (*node).value_mut().value });
        }

        if self.b1_map.contains_key(key) {
            self.adapt_toward_recency();
        } else if self.b2_map.contains_key(key) {
            self.adapt_toward_frequency();
        }
        self.metrics.core.record_miss();
        None
    }

    /// Inserts or updates a key per the four ARC cases. Returns the pair
    /// demoted out of the resident lists, if any (its key lives on as a
    /// ghost unless the cache took the direct-eviction path).
    pub(crate) fn put(&mut self, key: K, value: V) -> Option<(K, V)> {
        if self.capacity == 0 {
            return None;
        }

        // Case I: resident hit. Promote to T2 MRU and overwrite.
        if self.map.contains_key(&key) {
            let node = self.touch_resident(&key);
            // SAFETY: touch_resident returns a node linked in T2.
            unsafe {
                let entry = (*node).value_mut();
                let old_key = mem::replace(&mut entry.key, key);
                let old_value = mem::replace(&mut entry.value, value);
                return Some((old_key, old_value));
            }
        }

        // Case II: recency ghost hit. Grow p, make room, revive into T2.
        if self.b1_map.contains_key(&key) {
            self.adapt_toward_recency();
            let demoted = self.replace(false);
            self.forget_ghost(&key);
            self.insert_frequent(key, value);
            return demoted;
        }

        // Case III: frequency ghost hit. Shrink p, make room, revive.
        if self.b2_map.contains_key(&key) {
            self.adapt_toward_frequency();
            let demoted = self.replace(true);
            self.forget_ghost(&key);
            self.insert_frequent(key, value);
            return demoted;
        }

        // Case IV: the key is new everywhere.
        let mut demoted = None;
        let l1 = self.t1.len() + self.b1.len();
        if l1 == self.capacity {
            if self.t1.len() < self.capacity {
                // Recycle the oldest recency ghost, then make room.
                self.drop_recent_ghost_lru();
                demoted = self.replace(false);
            } else {
                // B1 is empty and T1 is full: evict outright, no ghost.
                demoted = self.evict_recent_lru();
            }
        } else {
            let total = l1 + self.t2.len() + self.b2.len();
            if total >= self.capacity {
                if total == 2 * self.capacity {
                    self.drop_frequent_ghost_lru();
                }
                demoted = self.replace(false);
            }
        }

        let node = self.t1.push_front(CacheEntry::new(key.clone(), value));
        self.map.insert(key, (Residence::Recent, node));
        self.metrics.core.record_insertion();
        demoted
    }

    pub(crate) fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        if let Some((residence, node)) = self.map.remove(key) {
            let list = match residence {
                Residence::Recent => &mut self.t1,
                Residence::Frequent => &mut self.t2,
            };
            // SAFETY: the index pairs each node with the list holding it.
            let entry = unsafe { list.unlink(node).into_value() };
            return Some(entry.value);
        }

        // Dropping a ghost is not observable through get, but it keeps
        // removed keys from steering future adaptation.
        if let Some(node) = self.b1_map.remove(key) {
            // SAFETY: ghost index pairs the node with b1.
            drop(unsafe { self.b1.unlink(node).into_value() });
        } else if let Some(node) = self.b2_map.remove(key) {
            // SAFETY: ghost index pairs the node with b2.
            drop(unsafe { self.b2.unlink(node).into_value() });
        }
        None
    }

    pub(crate) fn clear(&mut self) {
        self.map.clear();
        self.t1.clear();
        self.t2.clear();
        self.b1.clear();
        self.b2.clear();
        self.b1_map.clear();
        self.b2_map.clear();
        self.p = 0;
    }

    /// Moves a resident node to the MRU position of T2, promoting it out
    /// of T1 on its second access. Returns the node pointer.
    fn touch_resident<Q>(&mut self, key: &Q) -> *mut Node<CacheEntry<K, V>>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let (residence, node) = match self.map.get(key) {
            Some(&slot) => slot,
            None => unreachable!("touch_resident called for a non-resident key"),
        };
        match residence {
            Residence::Recent => {
                // SAFETY: a Recent slot pairs the node with t1.
                let raw = Box::into_raw(unsafe { self.t1.unlink(node) });
                // SAFETY: raw was just unlinked.
                unsafe { self.t2.attach_front(raw) };
                if let Some(slot) = self.map.get_mut(key) {
                    slot.0 = Residence::Frequent;
                }
                self.metrics.record_promotion();
            }
            Residence::Frequent => {
                // SAFETY: a Frequent slot pairs the node with t2.
                unsafe { self.t2.move_to_front(node) };
            }
        }
        node
    }

    /// B1 said the recency side is undersized: grow p by max(1, |B2|/|B1|).
    fn adapt_toward_recency(&mut self) {
        let delta = (self.b2.len() / self.b1.len()).max(1);
        self.p = (self.p + delta).min(self.capacity);
        self.metrics.record_recency_ghost_hit(self.p);
    }

    /// B2 said the frequency side is undersized: shrink p by
    /// max(1, |B1|/|B2|).
    fn adapt_toward_frequency(&mut self) {
        let delta = (self.b1.len() / self.b2.len()).max(1);
        self.p = self.p.saturating_sub(delta);
        self.metrics.record_frequency_ghost_hit(self.p);
    }

    /// The eviction primitive: demotes the LRU of T1 into B1 while T1
    /// exceeds the target (or meets it on a B2 hit), else the LRU of T2
    /// into B2. Vacuous when the preferred list is empty.
    fn replace(&mut self, frequent_ghost_hit: bool) -> Option<(K, V)> {
        let t1_len = self.t1.len();
        if t1_len > 0 && (t1_len > self.p || (frequent_ghost_hit && t1_len == self.p)) {
            self.demote_recent_lru()
        } else {
            self.demote_frequent_lru()
        }
    }

    /// Inserts a revived ghost key at the MRU position of T2.
    fn insert_frequent(&mut self, key: K, value: V) {
        let node = self.t2.push_front(CacheEntry::new(key.clone(), value));
        self.map.insert(key, (Residence::Frequent, node));
        self.metrics.core.record_insertion();
    }

    /// T1 LRU -> B1 MRU: the value is dropped, the key becomes a ghost.
    fn demote_recent_lru(&mut self) -> Option<(K, V)> {
        let node = self.t1.pop_back()?;
        // SAFETY: pop_back never yields a sigil node.
        let entry = unsafe { node.into_value() };
        self.map.remove(&entry.key);
        let ghost = self.b1.push_front(entry.key.clone());
        self.b1_map.insert(entry.key.clone(), ghost);
        self.metrics.core.record_eviction();
        Some(entry.into_pair())
    }

    /// T2 LRU -> B2 MRU.
    fn demote_frequent_lru(&mut self) -> Option<(K, V)> {
        let node = self.t2.pop_back()?;
        // SAFETY: pop_back never yields a sigil node.
        let entry = unsafe { node.into_value() };
        self.map.remove(&entry.key);
        let ghost = self.b2.push_front(entry.key.clone());
        self.b2_map.insert(entry.key.clone(), ghost);
        self.metrics.core.record_eviction();
        Some(entry.into_pair())
    }

    /// Evicts the T1 LRU without leaving a ghost (the |T1| == c corner of
    /// Case IV).
    fn evict_recent_lru(&mut self) -> Option<(K, V)> {
        let node = self.t1.pop_back()?;
        // SAFETY: pop_back never yields a sigil node.
        let entry = unsafe { node.into_value() };
        self.map.remove(&entry.key);
        self.metrics.core.record_eviction();
        Some(entry.into_pair())
    }

    /// Deletes the oldest B1 ghost.
    fn drop_recent_ghost_lru(&mut self) {
        if let Some(node) = self.b1.pop_back() {
            // SAFETY: pop_back never yields a sigil node.
            let key = unsafe { node.into_value() };
            self.b1_map.remove(&key);
        }
    }

    /// Deletes the oldest B2 ghost.
    fn drop_frequent_ghost_lru(&mut self) {
        if let Some(node) = self.b2.pop_back() {
            // SAFETY: pop_back never yields a sigil node.
            let key = unsafe { node.into_value() };
            self.b2_map.remove(&key);
        }
    }

    /// Removes `key` from whichever ghost list tracks it.
    fn forget_ghost<Q>(&mut self, key: &Q)
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        if let Some(node) = self.b1_map.remove(key) {
            // SAFETY: ghost index pairs the node with b1.
            drop(unsafe { self.b1.unlink(node).into_value() });
        } else if let Some(node) = self.b2_map.remove(key) {
            // SAFETY: ghost index pairs the node with b2.
            drop(unsafe { self.b2.unlink(node).into_value() });
        }
    }

    /// Asserts the ARC size invariants; used by tests after every step.
    #[cfg(test)]
    pub(crate) fn check_invariants(&self) {
        let c = self.capacity;
        assert!(self.t1.len() + self.t2.len() <= c, "resident bound");
        assert!(self.t1.len() + self.b1.len() <= c, "L1 bound");
        assert!(self.t2.len() + self.b2.len() <= 2 * c, "L2 bound");
        assert!(
            self.t1.len() + self.t2.len() + self.b1.len() + self.b2.len() <= 2 * c,
            "total bound"
        );
        assert!(self.p <= c, "target within capacity");
        assert_eq!(self.map.len(), self.t1.len() + self.t2.len(), "index sync");
        assert_eq!(self.b1_map.len(), self.b1.len(), "B1 index sync");
        assert_eq!(self.b2_map.len(), self.b2.len(), "B2 index sync");
    }
}

impl<K, V, S> core::fmt::Debug for ArcSegment<K, V, S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ArcSegment")
            .field("capacity", &self.capacity)
            .field("p", &self.p)
            .field("t1", &self.t1.len())
            .field("t2", &self.t2.len())
            .field("b1", &self.b1.len())
            .field("b2", &self.b2.len())
            .finish()
    }
}

/// An Adaptive Replacement Cache with O(1) operations.
///
/// ARC keeps residents split between a recency list and a frequency list
/// and tunes the split online using ghost lists of recently evicted keys.
/// It adapts to hotspot, scan, and phase-shifting workloads without any
/// tuning knobs.
///
/// # Example
///
/// ```
/// use cachekit::ArcCache;
/// use cachekit::config::ArcCacheConfig;
///
/// let mut cache = ArcCache::init(ArcCacheConfig::new(100), None);
/// cache.put("x", 1);
/// cache.get(&"x");   // second access: "x" now sits on the frequency side
/// assert_eq!(cache.frequent_len(), 1);
/// ```
#[derive(Debug)]
pub struct ArcCache<K, V, S = DefaultHashBuilder> {
    segment: ArcSegment<K, V, S>,
}

impl<K: Hash + Eq + Clone, V> ArcCache<K, V> {
    /// Creates a new ARC cache from a configuration with an optional
    /// hasher.
    pub fn init(
        config: ArcCacheConfig,
        hasher: Option<DefaultHashBuilder>,
    ) -> ArcCache<K, V, DefaultHashBuilder> {
        ArcCache {
            segment: ArcSegment::init(config, hasher.unwrap_or_default()),
        }
    }
}

impl<K: Hash + Eq + Clone, V, S: BuildHasher + Default> ArcCache<K, V, S> {
    /// Returns the maximum number of resident entries.
    #[inline]
    pub fn cap(&self) -> usize {
        self.segment.cap()
    }

    /// Returns the current number of resident entries (T1 + T2).
    #[inline]
    pub fn len(&self) -> usize {
        self.segment.len()
    }

    /// Returns `true` if no entries are resident.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.segment.is_empty()
    }

    /// Returns `true` if `key` is resident. Ghost keys are not resident.
    #[inline]
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.segment.contains(key)
    }

    /// Current adaptive target size for the recency side (`p`).
    #[inline]
    pub fn target_recency(&self) -> usize {
        self.segment.target_recency()
    }

    /// Number of residents on the recency side (T1).
    #[inline]
    pub fn recent_len(&self) -> usize {
        self.segment.recent_len()
    }

    /// Number of residents on the frequency side (T2).
    #[inline]
    pub fn frequent_len(&self) -> usize {
        self.segment.frequent_len()
    }

    /// Number of recency ghosts (B1).
    #[inline]
    pub fn recent_ghost_len(&self) -> usize {
        self.segment.recent_ghost_len()
    }

    /// Number of frequency ghosts (B2).
    #[inline]
    pub fn frequent_ghost_len(&self) -> usize {
        self.segment.frequent_ghost_len()
    }

    /// Retrieves a reference to the value for the given key.
    ///
    /// A resident hit promotes the entry to the MRU of T2. A ghost hit
    /// adapts the target `p` but still reports a miss, since ghosts carry
    /// no value.
    #[inline]
    pub fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.segment.get(key)
    }

    /// Retrieves a mutable reference to the value for the given key.
    #[inline]
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.segment.get_mut(key)
    }

    /// Inserts or updates a key per the ARC rules.
    ///
    /// Returns the pair demoted from the resident lists to make room, if
    /// any; the demoted key usually lives on as a ghost.
    #[inline]
    pub fn put(&mut self, key: K, value: V) -> Option<(K, V)> {
        self.segment.put(key, value)
    }

    /// Removes a key, returning its value if it was resident. Also forgets
    /// the key if it was a ghost.
    #[inline]
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.segment.remove(key)
    }

    /// Removes all entries, ghosts included, and resets the target to 0.
    #[inline]
    pub fn clear(&mut self) {
        self.segment.clear()
    }
}

impl<K: Hash + Eq + Clone, V: Clone, S: BuildHasher + Default> CachePolicy<K, V>
    for ArcCache<K, V, S>
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

impl<K: Hash + Eq + Clone, V, S: BuildHasher + Default> CacheMetrics for ArcCache<K, V, S> {
    fn metrics(&self) -> BTreeMap<String, f64> {
        self.segment.metrics().metrics()
    }

    fn algorithm_name(&self) -> &'static str {
        self.segment.metrics().algorithm_name()
    }
}
