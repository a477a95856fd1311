//! Configuration for the k-promotion LRU (LRU-k) cache.

use core::fmt;

/// Configuration for an LRU-k cache.
///
/// LRU-k admits a key into the main cache only after it has been accessed
/// `k` times; until then the key lives in a bounded history stage. `k = 1`
/// degenerates to plain LRU admission.
///
/// # Examples
///
/// ```
/// use cachekit::config::LruKCacheConfig;
///
/// let config = LruKCacheConfig::new(100, 200, 2);
/// assert_eq!(config.capacity, 100);
/// assert_eq!(config.history_capacity, 200);
/// assert_eq!(config.k, 2);
/// ```
#[derive(Clone, Copy)]
pub struct LruKCacheConfig {
    /// Maximum number of resident entries in the main cache.
    pub capacity: usize,
    /// Maximum number of keys tracked in the history stage. Overflow evicts
    /// the history entry that was accessed longest ago.
    pub history_capacity: usize,
    /// Accesses required before a key is admitted into the main cache.
    /// Must be at least 1; `LruKCache::init` panics otherwise.
    pub k: u32,
}

impl LruKCacheConfig {
    /// Creates a new configuration for an LRU-k cache.
    ///
    /// # Panics
    ///
    /// Panics if `k` is 0.
    pub fn new(capacity: usize, history_capacity: usize, k: u32) -> Self {
        assert!(k >= 1, "admission threshold k must be >= 1");
        Self {
            capacity,
            history_capacity,
            k,
        }
    }
}

impl fmt::Debug for LruKCacheConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruKCacheConfig")
            .field("capacity", &self.capacity)
            .field("history_capacity", &self.history_capacity)
            .field("k", &self.k)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lru_k_config_creation() {
        let config = LruKCacheConfig::new(100, 50, 2);
        assert_eq!(config.capacity, 100);
        assert_eq!(config.history_capacity, 50);
        assert_eq!(config.k, 2);
    }

    #[test]
    #[should_panic(expected = "admission threshold k must be >= 1")]
    fn test_lru_k_config_rejects_zero_k() {
        let _ = LruKCacheConfig::new(100, 50, 0);
    }
}
