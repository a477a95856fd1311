//! Configuration for the sharded (lock-striped) cache variants.
//!
//! A sharded config wraps any base policy config with a shard count. The
//! total capacity is divided across shards with ceiling division, so a
//! sharded cache can hold slightly more than the requested total when the
//! capacity does not divide evenly.

extern crate std;

use super::{ArcCacheConfig, LfuCacheConfig, LruCacheConfig};
use core::fmt;

/// Returns the default number of shards based on available parallelism.
pub(crate) fn default_shard_count() -> usize {
    std::thread::available_parallelism()
        .map(|p: std::num::NonZeroUsize| p.get())
        .unwrap_or(16)
        .clamp(4, 64)
}

/// Configuration for a sharded cache: a base policy config plus a shard
/// count.
///
/// Keys are routed to shards by `hash(key) % shards`; each shard is an
/// independent core with capacity `ceil(base.capacity / shards)` behind its
/// own mutex.
///
/// # Examples
///
/// ```
/// use cachekit::config::{ShardedCacheConfig, ShardedLruCacheConfig, LruCacheConfig};
///
/// // Default shard count (based on CPU parallelism):
/// let config = ShardedLruCacheConfig::new(10_000);
///
/// // Explicit shard count:
/// let config = ShardedCacheConfig {
///     base: LruCacheConfig::new(10_000),
///     shards: 8,
/// };
/// assert_eq!(config.shards, 8);
/// ```
#[derive(Clone, Copy)]
pub struct ShardedCacheConfig<B> {
    /// Policy configuration applied to the cache as a whole; the capacity
    /// is split across shards with ceiling division.
    pub base: B,
    /// Number of independent shards. Must be at least 1; the sharded cache
    /// constructors panic otherwise.
    pub shards: usize,
}

impl<B> ShardedCacheConfig<B> {
    /// Wraps a base config with an explicit shard count.
    ///
    /// # Panics
    ///
    /// Panics if `shards` is 0.
    pub fn with_shards(base: B, shards: usize) -> Self {
        assert!(shards > 0, "shard count must be > 0");
        Self { base, shards }
    }
}

/// Configuration for a sharded LRU cache.
pub type ShardedLruCacheConfig = ShardedCacheConfig<LruCacheConfig>;

/// Configuration for a sharded LFU cache.
pub type ShardedLfuCacheConfig = ShardedCacheConfig<LfuCacheConfig>;

/// Configuration for a sharded ARC cache.
pub type ShardedArcCacheConfig = ShardedCacheConfig<ArcCacheConfig>;

impl ShardedCacheConfig<LruCacheConfig> {
    /// Creates a sharded LRU configuration with the default shard count.
    pub fn new(capacity: usize) -> Self {
        Self {
            base: LruCacheConfig::new(capacity),
            shards: default_shard_count(),
        }
    }
}

impl ShardedCacheConfig<LfuCacheConfig> {
    /// Creates a sharded LFU configuration (no decay) with the default
    /// shard count.
    pub fn new(capacity: usize) -> Self {
        Self {
            base: LfuCacheConfig::new(capacity),
            shards: default_shard_count(),
        }
    }

    /// Creates a sharded LFU configuration with aging decay enabled and the
    /// default shard count.
    pub fn with_decay(capacity: usize, max_avg_freq: u32) -> Self {
        Self {
            base: LfuCacheConfig::with_decay(capacity, max_avg_freq),
            shards: default_shard_count(),
        }
    }
}

impl ShardedCacheConfig<ArcCacheConfig> {
    /// Creates a sharded ARC configuration with the default shard count.
    pub fn new(capacity: usize) -> Self {
        Self {
            base: ArcCacheConfig::new(capacity),
            shards: default_shard_count(),
        }
    }
}

impl<B: fmt::Debug> fmt::Debug for ShardedCacheConfig<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShardedCacheConfig")
            .field("base", &self.base)
            .field("shards", &self.shards)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sharded_config_defaults() {
        let config = ShardedLruCacheConfig::new(1000);
        assert_eq!(config.base.capacity, 1000);
        assert!(config.shards >= 4);
        assert!(config.shards <= 64);
    }

    #[test]
    fn test_sharded_config_with_shards() {
        let config = ShardedCacheConfig::with_shards(LfuCacheConfig::new(100), 8);
        assert_eq!(config.shards, 8);
    }

    #[test]
    #[should_panic(expected = "shard count must be > 0")]
    fn test_sharded_config_rejects_zero_shards() {
        let _ = ShardedCacheConfig::with_shards(ArcCacheConfig::new(100), 0);
    }
}
