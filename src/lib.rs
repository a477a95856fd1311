#![doc = include_str!("../README.md")]
#![no_std]
#![cfg_attr(docsrs, feature(doc_cfg))]

extern crate alloc;

#[cfg(any(not(feature = "hashbrown"), test))]
extern crate std;

/// The `CachePolicy` trait: the uniform contract all caches satisfy.
pub mod policy;

/// Cache entry type shared by all cores.
///
/// Provides the generic `CacheEntry<K, V, M>` structure holding a key, a
/// value, and policy-specific metadata.
pub mod entry;

/// Algorithm-specific metadata types.
///
/// - `LfuMeta`: access counter for LFU
/// - `HistoryMeta`: pre-admission hit count and staged value for LRU-k
pub mod meta;

/// Doubly linked list with in-place splice operations.
///
/// Internal infrastructure shared by every cache core. Exposes unsafe raw
/// pointer operations that require careful invariant maintenance; use the
/// cache implementations instead.
pub(crate) mod list;

/// Cache configuration structures.
pub mod config;

/// Least Recently Used (LRU) cache implementation.
///
/// A fixed-size cache that evicts the least recently used entry when
/// capacity is reached.
pub mod lru;

/// k-promotion LRU (LRU-k) cache implementation.
///
/// An LRU variant that admits a key only after `k` accesses, so one-shot
/// scans cannot displace the resident working set.
pub mod lru_k;

/// Least Frequently Used (LFU) cache implementation.
///
/// A fixed-size cache that evicts the least frequently used entry, with an
/// optional aging decay that halves all counts when the mean grows past a
/// configured threshold.
pub mod lfu;

/// Adaptive Replacement Cache (ARC) implementation.
///
/// Balances recency and frequency online: four lists (two resident, two
/// ghost) and an adaptive target steered by ghost hits.
pub mod arc;

/// Cache metrics system.
///
/// A common `CacheMetrics` trait plus per-algorithm counter structs, all
/// reporting through deterministic `BTreeMap`s.
pub mod metrics;

/// Sharded (lock-striped) cache implementations.
///
/// Thread-safe variants of all three policies: the key space is
/// partitioned across independent cores, each behind its own mutex.
///
/// Available when the `concurrent` feature is enabled.
#[cfg(feature = "concurrent")]
#[cfg_attr(docsrs, doc(cfg(feature = "concurrent")))]
pub mod sharded;

// Re-export cache types
pub use arc::ArcCache;
pub use lfu::LfuCache;
pub use lru::LruCache;
pub use lru_k::LruKCache;

// Re-export the uniform capability and entry types
pub use entry::CacheEntry;
pub use meta::{HistoryMeta, LfuMeta};
pub use policy::CachePolicy;

#[cfg(feature = "concurrent")]
pub use sharded::{ShardedArcCache, ShardedLfuCache, ShardedLruCache};
