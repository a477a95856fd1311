//! Sharded ARC Cache Implementation
//!
//! The thread-safe counterpart to [`ArcCache`](crate::ArcCache): N
//! independent ARC cores selected by key hash, each with its own lock,
//! four lists, and adaptive target. See the [module docs](crate::sharded)
//! for the sharding model.

use crate::arc::ArcSegment;
use crate::config::{ArcCacheConfig, ShardedArcCacheConfig};
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

/// A thread-safe ARC cache with sharded storage.
///
/// Each shard adapts its own target `p` to the slice of the key space it
/// sees, so different shards can settle at different recency/frequency
/// balances.
///
/// # Example
///
/// ```rust,ignore
/// use cachekit::ShardedArcCache;
/// use cachekit::config::ShardedArcCacheConfig;
///
/// let cache: ShardedArcCache<String, i32> =
///     ShardedArcCache::init(ShardedArcCacheConfig::new(10_000), None);
/// cache.put("key".to_string(), 42);
/// ```
pub struct ShardedArcCache<K, V, S = DefaultHashBuilder> {
    shards: Box<[Mutex<ArcSegment<K, V, S>>]>,
    hash_builder: S,
}

impl<K, V> ShardedArcCache<K, V, DefaultHashBuilder>
where
    K: Hash + Eq + Clone + Send,
    V: Send,
{
    /// Creates a new sharded ARC cache from a configuration with an
    /// optional hasher.
    ///
    /// # Panics
    ///
    /// Panics if `config.shards` is 0.
    pub fn init(config: ShardedArcCacheConfig, hasher: Option<DefaultHashBuilder>) -> Self {
        assert!(config.shards > 0, "shard count must be > 0");
        let per_shard = config.base.capacity.div_ceil(config.shards);

        let hash_builder = hasher.unwrap_or_default();
        let shards: Vec<_> = (0..config.shards)
            .map(|_| {
                Mutex::new(ArcSegment::init(
                    ArcCacheConfig::new(per_shard),
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

impl<K, V, S> ShardedArcCache<K, V, S>
where
    K: Hash + Eq + Clone + Send,
    V: Send,
    S: BuildHasher + Clone + Send + Default,
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

    /// Returns the total number of resident entries across all shards.
    pub fn len(&self) -> usize {
        self.shards.iter().map(|s| s.lock().len()).sum()
    }

    /// Returns `true` if every shard is empty.
    pub fn is_empty(&self) -> bool {
        self.shards.iter().all(|s| s.lock().is_empty())
    }

    /// Retrieves a clone of the value for the given key.
    ///
    /// A resident hit promotes within the owning shard; a ghost hit adapts
    /// that shard's target and misses.
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
    /// Returns the pair demoted from that shard's resident lists, if any.
    pub fn put(&self, key: K, value: V) -> Option<(K, V)> {
        let idx = self.shard_index(&key);
        self.shards[idx].lock().put(key, value)
    }

    /// Removes a key from its shard, returning the value if it was
    /// resident.
    pub fn remove<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let idx = self.shard_index(key);
        self.shards[idx].lock().remove(key)
    }

    /// Returns `true` if `key` is resident in its shard.
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let idx = self.shard_index(key);
        self.shards[idx].lock().contains(key)
    }

    /// Removes all entries (ghosts included) from all shards.
    pub fn clear(&self) {
        for shard in self.shards.iter() {
            shard.lock().clear();
        }
    }
}

impl<K, V, S> CachePolicy<K, V> for ShardedArcCache<K, V, S>
where
    K: Hash + Eq + Clone + Send,
    V: Clone + Send,
    S: BuildHasher + Clone + Send + Default,
{
    fn put(&mut self, key: K, value: V) {
        ShardedArcCache::put(self, key, value);
    }

    fn get(&mut self, key: &K) -> Option<V> {
        ShardedArcCache::get(self, key)
    }

    fn contains(&self, key: &K) -> bool {
        ShardedArcCache::contains(self, key)
    }

    fn len(&self) -> usize {
        ShardedArcCache::len(self)
    }

    fn capacity(&self) -> usize {
        self.cap()
    }
}

impl<K, V, S> CacheMetrics for ShardedArcCache<K, V, S>
where
    K: Hash + Eq + Clone + Send,
    V: Send,
    S: BuildHasher + Clone + Send + Default,
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
        "ShardedARC"
    }
}

impl<K, V, S> core::fmt::Debug for ShardedArcCache<K, V, S>
where
    K: Hash + Eq + Clone + Send,
    V: Send,
    S: BuildHasher + Clone + Send + Default,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ShardedArcCache")
            .field("shard_count", &self.shards.len())
            .field("len", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ShardedCacheConfig;

    extern crate std;
    use std::string::{String, ToString};
    use std::sync::Arc;
    use std::thread;
    use std::vec::Vec;

    fn make_config(capacity: usize, shards: usize) -> ShardedArcCacheConfig {
        ShardedCacheConfig {
            base: ArcCacheConfig::new(capacity),
            shards,
        }
    }

    #[test]
    fn test_basic_operations() {
        let cache: ShardedArcCache<String, i32> =
            ShardedArcCache::init(make_config(100, 16), None);

        cache.put("a".to_string(), 1);
        cache.put("b".to_string(), 2);

        assert_eq!(cache.get(&"a".to_string()), Some(1));
        assert_eq!(cache.get(&"b".to_string()), Some(2));
        assert_eq!(cache.get(&"c".to_string()), None);
        assert_eq!(cache.len(), 2);
        assert!(cache.contains(&"a".to_string()));
    }

    #[test]
    fn test_capacity_bound_under_churn() {
        let cache: ShardedArcCache<usize, usize> = ShardedArcCache::init(make_config(64, 4), None);

        for i in 0..2000 {
            cache.put(i % 300, i);
            if i % 3 == 0 {
                let _ = cache.get(&(i % 300));
            }
        }
        assert!(cache.len() <= cache.cap());
    }

    #[test]
    fn test_concurrent_access() {
        let cache: Arc<ShardedArcCache<String, usize>> =
            Arc::new(ShardedArcCache::init(make_config(1000, 16), None));

        let mut handles: Vec<std::thread::JoinHandle<()>> = Vec::new();
        for t in 0..8 {
            let cache = Arc::clone(&cache);
            handles.push(thread::spawn(move || {
                for i in 0..500 {
                    let key = std::format!("key_{}_{}", t, i % 100);
                    cache.put(key.clone(), i);
                    let _ = cache.get(&key);
                }
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }

        assert!(cache.len() <= cache.cap());
    }

    #[test]
    fn test_remove_and_clear() {
        let cache: ShardedArcCache<String, i32> = ShardedArcCache::init(make_config(100, 8), None);

        cache.put("a".to_string(), 1);
        assert_eq!(cache.remove(&"a".to_string()), Some(1));
        assert_eq!(cache.remove(&"a".to_string()), None);

        cache.put("b".to_string(), 2);
        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.algorithm_name(), "ShardedARC");
    }

    #[test]
    fn test_metrics_aggregation() {
        let cache: ShardedArcCache<String, i32> =
            ShardedArcCache::init(make_config(100, 16), None);

        cache.put("a".to_string(), 1);
        cache.get(&"a".to_string());

        let metrics = cache.metrics();
        assert_eq!(metrics.get("cache_hits").unwrap(), &1.0);
        assert_eq!(metrics.get("promotions").unwrap(), &1.0);
    }
}
