//! LRU-k Cache Metrics
//!
//! Metrics specific to the k-promotion LRU cache algorithm, covering the
//! admission history stage in addition to the core counters.

use super::{CacheMetrics, CoreCacheMetrics};
use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};

/// LRU-k specific metrics.
#[derive(Debug, Default, Clone)]
pub struct LruKCacheMetrics {
    /// Core counters common to all cache algorithms.
    pub core: CoreCacheMetrics,

    /// Keys promoted from the history stage into the main cache.
    pub history_promotions: u64,

    /// History entries dropped because the history stage overflowed.
    pub history_evictions: u64,
}

impl LruKCacheMetrics {
    /// Creates a zeroed metrics set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a promotion from the history stage into the main cache.
    #[inline]
    pub fn record_promotion(&mut self) {
        self.history_promotions += 1;
    }

    /// Records a history entry dropped by history overflow.
    #[inline]
    pub fn record_history_eviction(&mut self) {
        self.history_evictions += 1;
    }
}

impl CacheMetrics for LruKCacheMetrics {
    fn metrics(&self) -> BTreeMap<String, f64> {
        let mut metrics = self.core.to_btreemap();
        metrics.insert(
            "history_promotions".to_string(),
            self.history_promotions as f64,
        );
        metrics.insert(
            "history_evictions".to_string(),
            self.history_evictions as f64,
        );
        metrics
    }

    fn algorithm_name(&self) -> &'static str {
        "LRU-K"
    }
}
