//! Cache abstraction layer for Quill.
//!
//! This crate provides the caching traits that decouple cache consumers (the
//! code highlighter, mostly) from the storage behind them. Two traits form the
//! core API:
//!
//! - [`Cache`]: Factory for named cache buckets
//! - [`CacheBucket`]: Write-once key-value store
//!
//! Entries are never evicted, expired or overwritten: the first value stored
//! under a key is the value for the lifetime of the cache. Consumers are
//! expected to derive keys from the content they describe, so a second write
//! for the same key carries the same value and can be dropped.
//!
//! # Implementations
//!
//! - [`NullCache`] / [`NullCacheBucket`]: No-op implementations (always miss)
//! - [`MemoryCache`]: In-process implementation shared across threads
//!
//! # Example
//!
//! ```
//! use quill_cache::{Cache, MemoryCache};
//!
//! let cache = MemoryCache::new();
//! let bucket = cache.bucket("highlight");
//! assert!(bucket.insert("key", b"<pre>fn</pre>"));
//! assert!(!bucket.insert("key", b"ignored"));
//! assert_eq!(bucket.get("key"), Some(b"<pre>fn</pre>".to_vec()));
//! ```

mod ext;
mod memory;

pub use ext::CacheBucketExt;
pub use memory::MemoryCache;

/// A named partition within a [`Cache`].
///
/// Each bucket stores key-value pairs with write-once semantics. Keys are
/// opaque strings chosen by the caller; they should be content-derived so that
/// two writers racing on the same key always carry the same value.
pub trait CacheBucket: Send + Sync {
    /// Retrieve a cached value.
    ///
    /// Returns `None` on cache miss.
    fn get(&self, key: &str) -> Option<Vec<u8>>;

    /// Store a value unless the key is already present.
    ///
    /// Returns `true` if the value was stored, `false` if an entry already
    /// existed (the existing entry is left untouched).
    ///
    /// # Arguments
    ///
    /// * `key` - Cache key (e.g., content hash)
    /// * `value` - Raw bytes to cache
    fn insert(&self, key: &str, value: &[u8]) -> bool;

    /// Number of entries currently stored.
    fn len(&self) -> usize;

    /// Whether the bucket holds no entries.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Factory for named cache [`CacheBucket`]s.
///
/// A `Cache` produces buckets that are logically isolated from each other.
/// Calling [`bucket`](Self::bucket) twice with the same name returns handles
/// over the same storage.
pub trait Cache: Send + Sync {
    /// Open or create a named bucket.
    ///
    /// # Arguments
    ///
    /// * `name` - Bucket name (e.g., "highlight")
    fn bucket(&self, name: &str) -> Box<dyn CacheBucket>;
}

/// No-op [`CacheBucket`] that never stores or retrieves data.
///
/// Every `get` returns `None`; every `insert` is silently discarded.
/// Used as the bucket type for [`NullCache`].
pub struct NullCacheBucket;

impl CacheBucket for NullCacheBucket {
    fn get(&self, _key: &str) -> Option<Vec<u8>> {
        None
    }

    fn insert(&self, _key: &str, _value: &[u8]) -> bool {
        false
    }

    fn len(&self) -> usize {
        0
    }
}

/// No-op [`Cache`] that always returns [`NullCacheBucket`]s.
///
/// Use when caching is disabled. All operations are no-ops and all lookups
/// return `None`.
pub struct NullCache;

impl Cache for NullCache {
    fn bucket(&self, _name: &str) -> Box<dyn CacheBucket> {
        Box::new(NullCacheBucket)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_cache_always_misses() {
        let cache = NullCache;
        let bucket = cache.bucket("highlight");

        assert_eq!(bucket.get("key"), None);

        // Inserting reports nothing stored and reading back still misses
        assert!(!bucket.insert("key", b"hello"));
        assert_eq!(bucket.get("key"), None);
        assert!(bucket.is_empty());
    }

    #[test]
    fn test_null_cache_different_buckets_all_miss() {
        let cache = NullCache;

        for name in &["highlight", "pages", "images"] {
            let bucket = cache.bucket(name);
            bucket.insert("k", b"data");
            assert_eq!(bucket.get("k"), None, "bucket {name} should miss");
        }
    }
}
