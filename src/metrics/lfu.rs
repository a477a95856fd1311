//! LFU Cache Metrics
//!
//! Metrics specific to the LFU (Least Frequently Used) cache algorithm,
//! including the aging decay counter.

use super::{CacheMetrics, CoreCacheMetrics};
use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};

/// LFU-specific metrics.
#[derive(Debug, Default, Clone)]
pub struct LfuCacheMetrics {
    /// Core counters common to all cache algorithms.
    pub core: CoreCacheMetrics,

    /// Times the aging decay halved every access count.
    pub decay_runs: u64,
}

impl LfuCacheMetrics {
    /// Creates a zeroed metrics set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one run of the halving decay.
    #[inline]
    pub fn record_decay(&mut self) {
        self.decay_runs += 1;
    }
}

impl CacheMetrics for LfuCacheMetrics {
    fn metrics(&self) -> BTreeMap<String, f64> {
        let mut metrics = self.core.to_btreemap();
        metrics.insert("decay_runs".to_string(), self.decay_runs as f64);
        metrics
    }

    fn algorithm_name(&self) -> &'static str {
        "LFU"
    }
}
