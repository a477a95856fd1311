//! Cache Configuration Module
//!
//! Configuration structures for all cache algorithm implementations. Each
//! config is a plain `Copy` struct with public fields, so it can be built
//! literally or through the validated convenience constructors.
//!
//! Parameter misuse is a construction-time error: the cache `init`
//! constructors panic on an admission threshold of zero (LRU-k) or a shard
//! count of zero. A capacity of zero is *not* an error — it configures a
//! cache on which every `put` is a no-op and every `get` misses.
//!
//! # Configs
//!
//! | Config | Cache | Description |
//! |--------|-------|-------------|
//! | [`LruCacheConfig`] | [`LruCache`](crate::LruCache) | Least Recently Used |
//! | [`LruKCacheConfig`] | [`LruKCache`](crate::LruKCache) | LRU with k-promotion admission |
//! | [`LfuCacheConfig`] | [`LfuCache`](crate::LfuCache) | Least Frequently Used + aging |
//! | [`ArcCacheConfig`] | [`ArcCache`](crate::ArcCache) | Adaptive Replacement Cache |
//!
//! # Sharded configs (requires `concurrent` feature)
//!
//! [`ShardedCacheConfig`] wraps any base config with a shard count; the
//! aliases [`ShardedLruCacheConfig`], [`ShardedLfuCacheConfig`] and
//! [`ShardedArcCacheConfig`] name the three supported combinations.
//!
//! # Examples
//!
//! ```
//! use cachekit::config::LruCacheConfig;
//! use cachekit::LruCache;
//!
//! let config = LruCacheConfig::new(1000);
//! let cache: LruCache<String, i32> = LruCache::init(config, None);
//! ```

pub mod arc;
pub mod lfu;
pub mod lru;
pub mod lru_k;

#[cfg(feature = "concurrent")]
pub mod sharded;

pub use arc::ArcCacheConfig;
pub use lfu::LfuCacheConfig;
pub use lru::LruCacheConfig;
pub use lru_k::LruKCacheConfig;

#[cfg(feature = "concurrent")]
pub use sharded::{
    ShardedArcCacheConfig, ShardedCacheConfig, ShardedLfuCacheConfig, ShardedLruCacheConfig,
};
