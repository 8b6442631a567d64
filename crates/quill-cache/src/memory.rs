//! In-memory cache implementation.
//!
//! [`MemoryCache`] keeps every bucket in a shared map behind an `RwLock`.
//! Bucket handles are cheap to create and all handles with the same name see
//! the same entries, so a cache constructed once at startup can be handed to
//! any number of consumers.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use crate::{Cache, CacheBucket};

type Entries = Arc<RwLock<HashMap<String, Vec<u8>>>>;

/// In-process [`Cache`] living as long as its owner.
///
/// Entries are write-once: concurrent writers for the same key race, the first
/// insert wins and later ones are dropped.
#[derive(Default)]
pub struct MemoryCache {
    buckets: RwLock<HashMap<String, Entries>>,
}

impl MemoryCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self, name: &str) -> Entries {
        if let Some(entries) = self
            .buckets
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
        {
            return Arc::clone(entries);
        }

        let mut buckets = self.buckets.write().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(buckets.entry(name.to_owned()).or_default())
    }
}

impl Cache for MemoryCache {
    fn bucket(&self, name: &str) -> Box<dyn CacheBucket> {
        Box::new(MemoryCacheBucket {
            name: name.to_owned(),
            entries: self.entries(name),
        })
    }
}

/// Handle over one bucket of a [`MemoryCache`].
struct MemoryCacheBucket {
    name: String,
    entries: Entries,
}

impl CacheBucket for MemoryCacheBucket {
    fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn insert(&self, key: &str, value: &[u8]) -> bool {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        if entries.contains_key(key) {
            tracing::trace!(bucket = %self.name, key, "cache entry already present");
            return false;
        }
        entries.insert(key.to_owned(), value.to_vec());
        true
    }

    fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rayon::prelude::*;

    #[test]
    fn test_memory_bucket_insert_and_get() {
        let cache = MemoryCache::new();
        let bucket = cache.bucket("highlight");

        assert!(bucket.insert("key", b"<pre>hello</pre>"));
        assert_eq!(bucket.get("key"), Some(b"<pre>hello</pre>".to_vec()));
        assert_eq!(bucket.len(), 1);
    }

    #[test]
    fn test_memory_bucket_get_nonexistent_key() {
        let cache = MemoryCache::new();
        let bucket = cache.bucket("highlight");

        assert_eq!(bucket.get("nonexistent"), None);
        assert!(bucket.is_empty());
    }

    #[test]
    fn test_memory_bucket_is_write_once() {
        let cache = MemoryCache::new();
        let bucket = cache.bucket("highlight");

        assert!(bucket.insert("key", b"first"));
        assert!(!bucket.insert("key", b"second"));

        // First write wins
        assert_eq!(bucket.get("key"), Some(b"first".to_vec()));
        assert_eq!(bucket.len(), 1);
    }

    #[test]
    fn test_memory_cache_handles_share_storage() {
        let cache = MemoryCache::new();
        let writer = cache.bucket("highlight");
        let reader = cache.bucket("highlight");

        writer.insert("key", b"shared");
        assert_eq!(reader.get("key"), Some(b"shared".to_vec()));
    }

    #[test]
    fn test_memory_cache_buckets_are_isolated() {
        let cache = MemoryCache::new();

        let bucket_a = cache.bucket("alpha");
        let bucket_b = cache.bucket("beta");

        bucket_a.insert("key", b"alpha-data");
        bucket_b.insert("key", b"beta-data");

        assert_eq!(bucket_a.get("key"), Some(b"alpha-data".to_vec()));
        assert_eq!(bucket_b.get("key"), Some(b"beta-data".to_vec()));
    }

    #[test]
    fn test_memory_bucket_binary_data() {
        let cache = MemoryCache::new();
        let bucket = cache.bucket("raw");

        let binary_data: Vec<u8> = vec![0x00, 0x01, 0x0A, 0x0D, 0xFF, 0xFE, 0x80, 0x7F];
        bucket.insert("binary", &binary_data);
        assert_eq!(bucket.get("binary"), Some(binary_data));
    }

    #[test]
    fn test_concurrent_inserts_store_one_entry() {
        let cache = MemoryCache::new();

        let stored: usize = (0..64)
            .into_par_iter()
            .map(|_| usize::from(cache.bucket("highlight").insert("same", b"value")))
            .sum();

        assert_eq!(stored, 1);
        assert_eq!(cache.bucket("highlight").len(), 1);
    }
}
