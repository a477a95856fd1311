//! Configuration for the Adaptive Replacement Cache (ARC).

use core::fmt;

/// Configuration for an ARC (Adaptive Replacement Cache).
///
/// Capacity bounds the resident entries (T1 + T2); the ghost lists track up
/// to the same number of additional keys without values. The adaptive target
/// needs no configuration: it starts at 0 and is tuned by ghost hits.
///
/// # Examples
///
/// ```
/// use cachekit::config::ArcCacheConfig;
///
/// let config = ArcCacheConfig::new(100);
/// assert_eq!(config.capacity, 100);
/// ```
#[derive(Clone, Copy)]
pub struct ArcCacheConfig {
    /// Maximum number of resident entries. 0 configures a no-op cache.
    pub capacity: usize,
}

impl ArcCacheConfig {
    /// Creates a new configuration for an ARC cache.
    pub fn new(capacity: usize) -> Self {
        Self { capacity }
    }
}

impl fmt::Debug for ArcCacheConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArcCacheConfig")
            .field("capacity", &self.capacity)
            .finish()
    }
}
