//! Unified Cache Entry Type
//!
//! This module provides the `CacheEntry<K, V, M>` structure shared by all
//! cache cores. The generic `M` parameter lets each eviction policy attach
//! its own per-entry bookkeeping without affecting the core entry layout:
//! LRU needs none (position in the list is the bookkeeping), LFU stores an
//! access count, LRU-k's history stage stores a hit count and a staged value.

use core::fmt;

/// A cache entry holding a key, a value, and policy-specific metadata.
///
/// The entry lives inside a list node; the cache index maps the key to that
/// node. Use `M = ()` for policies without per-entry state.
///
/// # Examples
///
/// ```
/// use cachekit::entry::CacheEntry;
///
/// let entry: CacheEntry<&str, i32> = CacheEntry::new("key", 42);
/// assert_eq!(entry.key, "key");
/// assert_eq!(entry.value, 42);
/// ```
pub struct CacheEntry<K, V, M = ()> {
    /// The cached key.
    ///
    /// Also stored (cloned) in the cache index; the copy here is what allows
    /// an eviction taken from a list tail to find its index entry.
    pub key: K,

    /// The cached value.
    pub value: V,

    /// Policy-specific bookkeeping (access count for LFU, hit count for the
    /// LRU-k history stage). `()` for policies that need none.
    pub meta: M,
}

impl<K, V> CacheEntry<K, V> {
    /// Creates an entry without policy-specific metadata.
    #[inline]
    pub fn new(key: K, value: V) -> Self {
        Self {
            key,
            value,
            meta: (),
        }
    }
}

impl<K, V, M> CacheEntry<K, V, M> {
    /// Creates an entry carrying policy-specific metadata.
    ///
    /// # Examples
    ///
    /// ```
    /// use cachekit::entry::CacheEntry;
    /// use cachekit::meta::LfuMeta;
    ///
    /// let entry = CacheEntry::with_meta("key", 7, LfuMeta::new(1));
    /// assert_eq!(entry.meta.count, 1);
    /// ```
    #[inline]
    pub fn with_meta(key: K, value: V, meta: M) -> Self {
        Self { key, value, meta }
    }

    /// Splits the entry into its key-value pair, discarding the metadata.
    #[inline]
    pub fn into_pair(self) -> (K, V) {
        (self.key, self.value)
    }
}

impl<K: Clone, V: Clone, M: Clone> Clone for CacheEntry<K, V, M> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            value: self.value.clone(),
            meta: self.meta.clone(),
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug, M: fmt::Debug> fmt::Debug for CacheEntry<K, V, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheEntry")
            .field("key", &self.key)
            .field("value", &self.value)
            .field("meta", &self.meta)
            .finish()
    }
}
