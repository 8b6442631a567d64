//! Extension trait for [`CacheBucket`] with string convenience methods.

use crate::CacheBucket;

/// Typed convenience methods for [`CacheBucket`].
///
/// Implemented as default methods on an extension trait so that
/// [`CacheBucket`] stays object-safe and implementors only handle raw bytes.
///
/// # Example
///
/// ```
/// use quill_cache::{Cache, CacheBucketExt, MemoryCache};
///
/// let cache = MemoryCache::new();
/// let bucket = cache.bucket("highlight");
///
/// bucket.insert_string("rust", "<pre>fn main() {}</pre>");
/// assert_eq!(
///     bucket.get_string("rust").as_deref(),
///     Some("<pre>fn main() {}</pre>")
/// );
/// ```
pub trait CacheBucketExt: CacheBucket {
    /// Retrieve a cached UTF-8 string.
    ///
    /// Returns `None` on cache miss or invalid UTF-8.
    fn get_string(&self, key: &str) -> Option<String> {
        let bytes = self.get(key)?;
        String::from_utf8(bytes).ok()
    }

    /// Store a string value unless the key is already present.
    fn insert_string(&self, key: &str, value: &str) -> bool {
        self.insert(key, value.as_bytes())
    }
}

impl<B: CacheBucket + ?Sized> CacheBucketExt for B {}
