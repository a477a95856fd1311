//! Configuration for the Least Frequently Used (LFU) cache.

use core::fmt;

/// Configuration for an LFU (Least Frequently Used) cache.
///
/// `max_avg_freq` controls the aging decay: when it is non-zero and the mean
/// access count of resident entries exceeds it, every count is halved. 0
/// disables decay entirely (pure LFU).
///
/// # Examples
///
/// ```
/// use cachekit::config::LfuCacheConfig;
///
/// let pure = LfuCacheConfig::new(100);
/// assert_eq!(pure.max_avg_freq, 0);
///
/// let aging = LfuCacheConfig::with_decay(100, 8);
/// assert_eq!(aging.max_avg_freq, 8);
/// ```
#[derive(Clone, Copy)]
pub struct LfuCacheConfig {
    /// Maximum number of resident entries. 0 configures a no-op cache.
    pub capacity: usize,
    /// Mean-access-count threshold that triggers a halving decay.
    /// 0 disables decay.
    pub max_avg_freq: u32,
}

impl LfuCacheConfig {
    /// Creates a configuration for a pure LFU cache (no decay).
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            max_avg_freq: 0,
        }
    }

    /// Creates a configuration with aging decay enabled.
    pub fn with_decay(capacity: usize, max_avg_freq: u32) -> Self {
        Self {
            capacity,
            max_avg_freq,
        }
    }
}

impl fmt::Debug for LfuCacheConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LfuCacheConfig")
            .field("capacity", &self.capacity)
            .field("max_avg_freq", &self.max_avg_freq)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lfu_config_creation() {
        let config = LfuCacheConfig::new(100);
        assert_eq!(config.capacity, 100);
        assert_eq!(config.max_avg_freq, 0);
    }

    #[test]
    fn test_lfu_config_with_decay() {
        let config = LfuCacheConfig::with_decay(100, 4);
        assert_eq!(config.max_avg_freq, 4);
    }
}
