//! Configuration for the Least Recently Used (LRU) cache.

use core::fmt;

/// Configuration for an LRU (Least Recently Used) cache.
///
/// # Examples
///
/// ```
/// use cachekit::config::LruCacheConfig;
///
/// let config = LruCacheConfig::new(100);
/// assert_eq!(config.capacity, 100);
/// ```
#[derive(Clone, Copy)]
pub struct LruCacheConfig {
    /// Maximum number of resident entries. 0 configures a no-op cache.
    pub capacity: usize,
}

impl LruCacheConfig {
    /// Creates a new configuration for an LRU cache.
    pub fn new(capacity: usize) -> Self {
        Self { capacity }
    }
}

impl fmt::Debug for LruCacheConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruCacheConfig")
            .field("capacity", &self.capacity)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lru_config_creation() {
        let config = LruCacheConfig::new(100);
        assert_eq!(config.capacity, 100);
    }

    #[test]
    fn test_lru_config_zero_capacity_is_allowed() {
        let config = LruCacheConfig::new(0);
        assert_eq!(config.capacity, 0);
    }
}
