//! Sharded Cache Implementations
//!
//! Thread-safe caches built from N independent single-threaded cores, each
//! behind its own `parking_lot::Mutex`. A key is routed to exactly one
//! shard by `hash(key) % N`; the router holds no lock of its own, so
//! operations on different shards never contend.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────────┐
//! │                        ShardedCache (N shards)                       │
//! │                                                                      │
//! │  hash(key) % N  ──▶  shard selection                                 │
//! │                                                                      │
//! │  ┌──────────────┐ ┌──────────────┐     ┌──────────────┐              │
//! │  │   Shard 0    │ │   Shard 1    │ ... │  Shard N-1   │              │
//! │  │  ┌────────┐  │ │  ┌────────┐  │     │  ┌────────┐  │              │
//! │  │  │ Mutex  │  │ │  │ Mutex  │  │     │  │ Mutex  │  │              │
//! │  │  └────┬───┘  │ │  └────┬───┘  │     │  └────┬───┘  │              │
//! │  │  ┌────▼───┐  │ │  ┌────▼───┐  │     │  ┌────▼───┐  │              │
//! │  │  │  core  │  │ │  │  core  │  │     │  │  core  │  │              │
//! │  │  └────────┘  │ │  └────────┘  │     │  └────────┘  │              │
//! │  └──────────────┘ └──────────────┘     └──────────────┘              │
//! └──────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Capacity is divided across shards with ceiling division: each shard
//! holds at most `ceil(capacity / N)` entries, so the whole cache can
//! exceed the requested total by at most `N - 1` when the division is
//! uneven. Eviction order is per-shard, not global: a shard evicts its own
//! LRU/LFU/ARC victim even if another shard holds a globally older entry.
//!
//! Within one shard, operations execute in mutex acquisition order.
//! Across shards there is no ordering guarantee.
//!
//! Available when the `concurrent` feature is enabled.

mod arc;
mod lfu;
mod lru;

pub use self::arc::ShardedArcCache;
pub use self::lfu::ShardedLfuCache;
pub use self::lru::ShardedLruCache;

use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};

/// Fixes up rate metrics after summing per-shard reports: summed counters
/// are meaningful, summed ratios are not.
pub(crate) fn recompute_rates(aggregated: &mut BTreeMap<String, f64>) {
    let requests = aggregated.get("requests").copied().unwrap_or(0.0);
    let hits = aggregated.get("cache_hits").copied().unwrap_or(0.0);
    let (hit_rate, miss_rate) = if requests > 0.0 {
        (hits / requests, (requests - hits) / requests)
    } else {
        (0.0, 0.0)
    };
    aggregated.insert("hit_rate".to_string(), hit_rate);
    aggregated.insert("miss_rate".to_string(), miss_rate);
}
