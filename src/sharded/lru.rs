//! Sharded LRU Cache Implementation
//!
//! The thread-safe counterpart to [`LruCache`](crate::LruCache): N
//! independent LRU cores selected by key hash, each behind its own mutex.
//! See the [module docs](crate::sharded) for the sharding model.

use crate::config::{LruCacheConfig, ShardedLruCacheConfig};
use crate::lru::LruSegment;
use crate::metrics::CacheMetrics;
use crate::policy::CachePolicy;
use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;
use core::borrow::Borrow;
use core::hash::{BuildHasher, Hash};
use parking_lot::Mutex;

#[cfg(feature = "hashbrown")]
use hashbrown::DefaultHashBuilder;

#[cfg(not(feature = "hashbrown"))]
use std::collections::hash_map::RandomState as DefaultHashBuilder;

/// A thread-safe LRU cache with sharded storage.
///
/// Keys are partitioned across shards by hash; each shard is an
/// independent [`LruCache`](crate::LruCache) core with its own lock and
/// capacity slice `ceil(capacity / shards)`. Recency ordering is
/// per-shard, not global.
///
/// # Example
///
/// ```rust,ignore
/// use cachekit::ShardedLruCache;
/// use cachekit::config::ShardedLruCacheConfig;
/// use std::sync::Arc;
///
/// let cache = Arc::new(ShardedLruCache::init(
///     ShardedLruCacheConfig::new(10_000),
///     None,
/// ));
/// cache.put("key".to_string(), 42);
/// assert_eq!(cache.get(&"key".to_string()), Some(42));
/// ```
pub struct ShardedLruCache<K, V, S = DefaultHashBuilder> {
    shards: Box<[Mutex<LruSegment<K, V, S>>]>,
    hash_builder: S,
}

impl<K, V> ShardedLruCache<K, V, DefaultHashBuilder>
where
    K: Hash + Eq + Clone + Send,
    V: Send,
{
    /// Creates a new sharded LRU cache from a configuration with an
    /// optional hasher.
    ///
    /// # Panics
    ///
    /// Panics if `config.shards` is 0.
    pub fn init(config: ShardedLruCacheConfig, hasher: Option<DefaultHashBuilder>) -> Self {
        assert!(config.shards > 0, "shard count must be > 0");
        let per_shard = config.base.capacity.div_ceil(config.shards);

        let hash_builder = hasher.unwrap_or_default();
        let shards: Vec<_> = (0..config.shards)
            .map(|_| {
                Mutex::new(LruSegment::init(
                    LruCacheConfig::new(per_shard),
                    hash_builder.clone(),
                ))
            })
            .collect();

        Self {
            shards: shards.into_boxed_slice(),
            hash_builder,
        }
    }
}

impl<K, V, S> ShardedLruCache<K, V, S>
where
    K: Hash + Eq + Clone + Send,
    V: Send,
    S: BuildHasher + Clone + Send,
{
    /// Returns the shard index for the given key.
    #[inline]
    fn shard_index<Q>(&self, key: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash,
    {
        (self.hash_builder.hash_one(key) as usize) % self.shards.len()
    }

    /// Returns the number of shards in the cache.
    pub fn shard_count(&self) -> usize {
        self.shards.len()
    }

    /// Returns the total capacity across all shards.
    pub fn cap(&self) -> usize {
        self.shards.iter().map(|s| s.lock().cap()).sum()
    }

    /// Returns the total number of entries across all shards.
    ///
    /// Acquires each shard lock in turn, so the value may be slightly
    /// stale under concurrent mutation.
    pub fn len(&self) -> usize {
        self.shards.iter().map(|s| s.lock().len()).sum()
    }

    /// Returns `true` if every shard is empty.
    pub fn is_empty(&self) -> bool {
        self.shards.iter().all(|s| s.lock().is_empty())
    }

    /// Returns the number of entries resident in the shard that owns
    /// `key`. Useful for checking per-shard bounds.
    pub fn shard_len_for<Q>(&self, key: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.shards[self.shard_index(key)].lock().len()
    }

    /// Retrieves a clone of the value for the given key.
    ///
    /// Cloning lets the shard lock drop before the value is used. For
    /// read-only access without a clone, use [`get_with`](Self::get_with).
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
        V: Clone,
    {
        let idx = self.shard_index(key);
        self.shards[idx].lock().get(key).cloned()
    }

    /// Applies `f` to the value while the shard lock is held.
    pub fn get_with<Q, F, R>(&self, key: &Q, f: F) -> Option<R>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
        F: FnOnce(&V) -> R,
    {
        let idx = self.shard_index(key);
        self.shards[idx].lock().get(key).map(f)
    }

    /// Applies `f` to a mutable reference while the shard lock is held.
    pub fn get_mut_with<Q, F, R>(&self, key: &Q, f: F) -> Option<R>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
        F: FnOnce(&mut V) -> R,
    {
        let idx = self.shard_index(key);
        self.shards[idx].lock().get_mut(key).map(f)
    }

    /// Inserts a key-value pair into the owning shard.
    ///
    /// Returns the pair displaced from that shard, if any.
    pub fn put(&self, key: K, value: V) -> Option<(K, V)> {
        let idx = self.shard_index(&key);
        self.shards[idx].lock().put(key, value)
    }

    /// Removes a key from its shard, returning the value if present.
    pub fn remove<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let idx = self.shard_index(key);
        self.shards[idx].lock().remove(key)
    }

    /// Returns `true` if `key` is resident, without touching recency.
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let idx = self.shard_index(key);
        self.shards[idx].lock().contains(key)
    }

    /// Removes all entries from all shards, one shard at a time.
    pub fn clear(&self) {
        for shard in self.shards.iter() {
            shard.lock().clear();
        }
    }
}

impl<K, V, S> CachePolicy<K, V> for ShardedLruCache<K, V, S>
where
    K: Hash + Eq + Clone + Send,
    V: Clone + Send,
    S: BuildHasher + Clone + Send,
{
    fn put(&mut self, key: K, value: V) {
        ShardedLruCache::put(self, key, value);
    }

    fn get(&mut self, key: &K) -> Option<V> {
        ShardedLruCache::get(self, key)
    }

    fn contains(&self, key: &K) -> bool {
        ShardedLruCache::contains(self, key)
    }

    fn len(&self) -> usize {
        ShardedLruCache::len(self)
    }

    fn capacity(&self) -> usize {
        self.cap()
    }
}

impl<K, V, S> CacheMetrics for ShardedLruCache<K, V, S>
where
    K: Hash + Eq + Clone + Send,
    V: Send,
    S: BuildHasher + Clone + Send,
{
    fn metrics(&self) -> BTreeMap<String, f64> {
        let mut aggregated = BTreeMap::new();
        for shard in self.shards.iter() {
            for (key, value) in shard.lock().metrics().metrics() {
                *aggregated.entry(key).or_insert(0.0) += value;
            }
        }
        crate::sharded::recompute_rates(&mut aggregated);
        aggregated
    }

    fn algorithm_name(&self) -> &'static str {
        "ShardedLRU"
    }
}

impl<K, V, S> core::fmt::Debug for ShardedLruCache<K, V, S>
where
    K: Hash + Eq + Clone + Send,
    V: Send,
    S: BuildHasher + Clone + Send,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ShardedLruCache")
            .field("shard_count", &self.shards.len())
            .field("len", &self.len())
            .finish()
    }
}
