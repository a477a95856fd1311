//! Sharded LFU Cache Implementation
//!
//! The thread-safe counterpart to [`LfuCache`](crate::LfuCache): N
//! independent LFU cores selected by key hash, each with its own lock,
//! frequency buckets, and aging decay state. See the
//! [module docs](crate::sharded) for the sharding model.

use crate::config::{LfuCacheConfig, ShardedLfuCacheConfig};
use crate::lfu::LfuSegment;
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

/// A thread-safe LFU cache with sharded storage.
///
/// Frequency counting, eviction order, and the aging decay all apply
/// per-shard: each shard halves its own counts when its own mean crosses
/// `max_avg_freq`.
///
/// # Example
///
/// ```rust,ignore
/// use cachekit::ShardedLfuCache;
/// use cachekit::config::ShardedLfuCacheConfig;
///
/// let cache: ShardedLfuCache<String, i32> =
///     ShardedLfuCache::init(ShardedLfuCacheConfig::with_decay(10_000, 8), None);
/// cache.put("key".to_string(), 42);
/// ```
pub struct ShardedLfuCache<K, V, S = DefaultHashBuilder> {
    shards: Box<[Mutex<LfuSegment<K, V, S>>]>,
    hash_builder: S,
}

impl<K, V> ShardedLfuCache<K, V, DefaultHashBuilder>
where
    K: Hash + Eq + Clone + Send,
    V: Send,
{
    /// Creates a new sharded LFU cache from a configuration with an
    /// optional hasher.
    ///
    /// # Panics
    ///
    /// Panics if `config.shards` is 0.
    pub fn init(config: ShardedLfuCacheConfig, hasher: Option<DefaultHashBuilder>) -> Self {
        assert!(config.shards > 0, "shard count must be > 0");
        let per_shard = config.base.capacity.div_ceil(config.shards);

        let hash_builder = hasher.unwrap_or_default();
        let shards: Vec<_> = (0..config.shards)
            .map(|_| {
                Mutex::new(LfuSegment::init(
                    LfuCacheConfig::with_decay(per_shard, config.base.max_avg_freq),
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

impl<K, V, S> ShardedLfuCache<K, V, S>
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
    pub fn len(&self) -> usize {
        self.shards.iter().map(|s| s.lock().len()).sum()
    }

    /// Returns `true` if every shard is empty.
    pub fn is_empty(&self) -> bool {
        self.shards.iter().all(|s| s.lock().is_empty())
    }

    /// Retrieves a clone of the value for the given key, raising its
    /// access count on a hit.
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
    /// Returns the pair evicted from that shard, if any.
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

    /// Returns `true` if `key` is resident, without touching its count.
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

impl<K, V, S> CachePolicy<K, V> for ShardedLfuCache<K, V, S>
where
    K: Hash + Eq + Clone + Send,
    V: Clone + Send,
    S: BuildHasher + Clone + Send,
{
    fn put(&mut self, key: K, value: V) {
        ShardedLfuCache::put(self, key, value);
    }

    fn get(&mut self, key: &K) -> Option<V> {
        ShardedLfuCache::get(self, key)
    }

    fn contains(&self, key: &K) -> bool {
        ShardedLfuCache::contains(self, key)
    }

    fn len(&self) -> usize {
        ShardedLfuCache::len(self)
    }

    fn capacity(&self) -> usize {
        self.cap()
    }
}

impl<K, V, S> CacheMetrics for ShardedLfuCache<K, V, S>
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
        "ShardedLFU"
    }
}

impl<K, V, S> core::fmt::Debug for ShardedLfuCache<K, V, S>
where
    K: Hash + Eq + Clone + Send,
    V: Send,
    S: BuildHasher + Clone + Send,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ShardedLfuCache")
            .field("shard_count", &self.shards.len())
            .field("len", &self.len())
            .finish()
    }
}
