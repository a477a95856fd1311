//! Cache Metrics System
//!
//! A flexible metrics system for the cache algorithms using BTreeMap-based
//! reporting. Each algorithm tracks its own specific counters while
//! implementing the common [`CacheMetrics`] trait.
//!
//! # Why BTreeMap over HashMap?
//!
//! Metrics always appear in a consistent order, which keeps test assertions,
//! log output and exported reports reproducible. The O(log n) cost is
//! irrelevant at ~10 metric keys.

use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};

pub mod arc;
pub mod lfu;
pub mod lru;
pub mod lru_k;

pub use arc::ArcCacheMetrics;
pub use lfu::LfuCacheMetrics;
pub use lru::LruCacheMetrics;
pub use lru_k::LruKCacheMetrics;

/// Common counters tracked by all cache algorithms.
///
/// Misses are recorded by the cache itself when a `get` finds nothing, so
/// `requests == cache_hits + misses` holds without caller involvement.
#[derive(Debug, Default, Clone)]
pub struct CoreCacheMetrics {
    /// Total number of lookups (`get`/`get_mut`) made against the cache.
    pub requests: u64,

    /// Lookups that found a resident entry.
    pub cache_hits: u64,

    /// Entries inserted into the cache.
    pub insertions: u64,

    /// Entries removed due to capacity pressure.
    pub evictions: u64,
}

impl CoreCacheMetrics {
    /// Creates a zeroed counter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a lookup that found a resident entry.
    #[inline]
    pub fn record_hit(&mut self) {
        self.requests += 1;
        self.cache_hits += 1;
    }

    /// Records a lookup that found nothing.
    #[inline]
    pub fn record_miss(&mut self) {
        self.requests += 1;
    }

    /// Records an insertion of a new entry.
    #[inline]
    pub fn record_insertion(&mut self) {
        self.insertions += 1;
    }

    /// Records an eviction due to capacity pressure.
    #[inline]
    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    /// Fraction of lookups that hit, in `[0.0, 1.0]`. 0.0 before any lookup.
    pub fn hit_rate(&self) -> f64 {
        if self.requests > 0 {
            self.cache_hits as f64 / self.requests as f64
        } else {
            0.0
        }
    }

    /// Fraction of lookups that missed, in `[0.0, 1.0]`.
    pub fn miss_rate(&self) -> f64 {
        if self.requests > 0 {
            (self.requests - self.cache_hits) as f64 / self.requests as f64
        } else {
            0.0
        }
    }

    /// Converts the core counters to a BTreeMap for reporting.
    pub fn to_btreemap(&self) -> BTreeMap<String, f64> {
        let mut metrics = BTreeMap::new();

        metrics.insert("cache_hits".to_string(), self.cache_hits as f64);
        metrics.insert(
            "cache_misses".to_string(),
            (self.requests - self.cache_hits) as f64,
        );
        metrics.insert("evictions".to_string(), self.evictions as f64);
        metrics.insert("insertions".to_string(), self.insertions as f64);
        metrics.insert("requests".to_string(), self.requests as f64);

        metrics.insert("hit_rate".to_string(), self.hit_rate());
        metrics.insert("miss_rate".to_string(), self.miss_rate());

        metrics
    }
}

/// Trait implemented by every cache for metrics reporting.
///
/// Reports are `BTreeMap`s so that keys come out in deterministic order,
/// which keeps benchmark comparisons and test output reproducible.
pub trait CacheMetrics {
    /// Returns all metrics as key-value pairs in deterministic order.
    fn metrics(&self) -> BTreeMap<String, f64>;

    /// Algorithm name for identification (e.g. "LRU", "ARC").
    fn algorithm_name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_metrics_counters() {
        let mut core = CoreCacheMetrics::new();
        core.record_hit();
        core.record_hit();
        core.record_miss();
        core.record_insertion();
        core.record_eviction();

        assert_eq!(core.requests, 3);
        assert_eq!(core.cache_hits, 2);
        assert_eq!(core.insertions, 1);
        assert_eq!(core.evictions, 1);
    }

    #[test]
    fn test_rates() {
        let mut core = CoreCacheMetrics::new();
        assert_eq!(core.hit_rate(), 0.0);
        assert_eq!(core.miss_rate(), 0.0);

        core.record_hit();
        core.record_miss();
        core.record_miss();
        core.record_miss();

        assert_eq!(core.hit_rate(), 0.25);
        assert_eq!(core.miss_rate(), 0.75);
    }

    #[test]
    fn test_to_btreemap_is_complete() {
        let mut core = CoreCacheMetrics::new();
        core.record_hit();
        core.record_miss();

        let map = core.to_btreemap();
        assert_eq!(map.get("requests"), Some(&2.0));
        assert_eq!(map.get("cache_hits"), Some(&1.0));
        assert_eq!(map.get("cache_misses"), Some(&1.0));
        assert_eq!(map.get("hit_rate"), Some(&0.5));
    }
}
