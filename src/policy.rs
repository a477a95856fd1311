//! The uniform capability implemented by every cache in this crate.
//!
//! Cache cores expose richer inherent APIs (borrowed returns, displaced-pair
//! results, closure-based access on the sharded types); this trait is the
//! common denominator that lets a policy be chosen at runtime or swapped
//! behind a generic bound without touching call sites.
//!
//! # Examples
//!
//! ```
//! use cachekit::{CachePolicy, LruCache, ArcCache};
//! use cachekit::config::{LruCacheConfig, ArcCacheConfig};
//!
//! fn hit_after_put<C: CachePolicy<u32, &'static str>>(cache: &mut C) {
//!     cache.put(1, "one");
//!     assert_eq!(cache.get(&1), Some("one"));
//! }
//!
//! hit_after_put(&mut LruCache::init(LruCacheConfig::new(4), None));
//! hit_after_put(&mut ArcCache::init(ArcCacheConfig::new(4), None));
//! ```

/// Abstract contract all caches satisfy.
///
/// Guarantees common to every implementation:
///
/// - After `put(k, v)`, `get(&k)` returns `v` unless intervening operations
///   evicted `k` under the policy's rules.
/// - Resident entries never exceed the configured capacity; a capacity of 0
///   makes `put` a no-op.
/// - `get` on a hit updates whatever bookkeeping the policy keeps (recency,
///   frequency, adaptive state); `contains` updates nothing.
/// - All operations are O(1) expected amortized.
pub trait CachePolicy<K, V> {
    /// Inserts or updates `key`. Never fails; exceeding capacity triggers
    /// eviction, not an error.
    fn put(&mut self, key: K, value: V);

    /// Returns the current value for `key`, updating the policy's
    /// bookkeeping on a hit. A miss is `None`, never an error.
    fn get(&mut self, key: &K) -> Option<V>;

    /// Convenience form of [`get`](Self::get): writes the value into `out`
    /// and returns `true` on a hit.
    fn get_into(&mut self, key: &K, out: &mut V) -> bool {
        match self.get(key) {
            Some(value) => {
                *out = value;
                true
            }
            None => false,
        }
    }

    /// Returns `true` if `key` is resident, without updating any
    /// recency or frequency state.
    fn contains(&self, key: &K) -> bool;

    /// Returns the number of resident entries.
    fn len(&self) -> usize;

    /// Returns `true` if no entries are resident.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the configured capacity (maximum resident entries).
    fn capacity(&self) -> usize;
}
