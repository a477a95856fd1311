//! LRU Cache Metrics
//!
//! Metrics specific to the LRU (Least Recently Used) cache algorithm.

use super::{CacheMetrics, CoreCacheMetrics};
use alloc::collections::BTreeMap;
use alloc::string::String;

/// LRU-specific metrics.
///
/// LRU tracks only the core counters; the structure exists so every
/// algorithm reports through the same shape.
#[derive(Debug, Default, Clone)]
pub struct LruCacheMetrics {
    /// Core counters common to all cache algorithms.
    pub core: CoreCacheMetrics,
}

impl LruCacheMetrics {
    /// Creates a zeroed metrics set.
    pub fn new() -> Self {
        Self::default()
    }
}

impl CacheMetrics for LruCacheMetrics {
    fn metrics(&self) -> BTreeMap<String, f64> {
        self.core.to_btreemap()
    }

    fn algorithm_name(&self) -> &'static str {
        "LRU"
    }
}
