//! ARC Cache Metrics
//!
//! Metrics specific to the Adaptive Replacement Cache: ghost-list hits on
//! both sides, resident promotions, and the current adaptive target.

use super::{CacheMetrics, CoreCacheMetrics};
use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};

/// ARC-specific metrics.
#[derive(Debug, Default, Clone)]
pub struct ArcCacheMetrics {
    /// Core counters common to all cache algorithms.
    pub core: CoreCacheMetrics,

    /// Accesses that hit the recency ghost list (B1). Each one grows the
    /// adaptive target.
    pub recency_ghost_hits: u64,

    /// Accesses that hit the frequency ghost list (B2). Each one shrinks
    /// the adaptive target.
    pub frequency_ghost_hits: u64,

    /// Entries promoted from the recency side (T1) to the frequency side
    /// (T2) on their second access.
    pub promotions: u64,

    /// Current adaptive target size for T1 (the `p` parameter), kept in
    /// sync by the cache on every adaptation.
    pub target_recency: u64,
}

impl ArcCacheMetrics {
    /// Creates a zeroed metrics set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a hit on the recency ghost list and the resulting target.
    #[inline]
    pub fn record_recency_ghost_hit(&mut self, target: usize) {
        self.recency_ghost_hits += 1;
        self.target_recency = target as u64;
    }

    /// Records a hit on the frequency ghost list and the resulting target.
    #[inline]
    pub fn record_frequency_ghost_hit(&mut self, target: usize) {
        self.frequency_ghost_hits += 1;
        self.target_recency = target as u64;
    }

    /// Records a T1 -> T2 promotion.
    #[inline]
    pub fn record_promotion(&mut self) {
        self.promotions += 1;
    }
}

impl CacheMetrics for ArcCacheMetrics {
    fn metrics(&self) -> BTreeMap<String, f64> {
        let mut metrics = self.core.to_btreemap();
        metrics.insert(
            "recency_ghost_hits".to_string(),
            self.recency_ghost_hits as f64,
        );
        metrics.insert(
            "frequency_ghost_hits".to_string(),
            self.frequency_ghost_hits as f64,
        );
        metrics.insert("promotions".to_string(), self.promotions as f64);
        metrics.insert("target_recency".to_string(), self.target_recency as f64);
        metrics
    }

    fn algorithm_name(&self) -> &'static str {
        "ARC"
    }
}
