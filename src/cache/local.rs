//! Local Cache Module
//!
//! Concurrency-safe wrapper around the byte-bounded LRU cache.

use parking_lot::Mutex;

use crate::cache::{ByteView, LruCache};

// == Local Cache ==
/// A group's local store.
///
/// Reads reorder the recency list, so both `get` and `add` take the same
/// exclusive lock. The LRU itself is only allocated on the first `add`.
#[derive(Debug)]
pub struct LocalCache {
    lru: Mutex<Option<LruCache<ByteView>>>,
    cache_bytes: u64,
}

impl LocalCache {
    /// Creates an empty cache with the given byte budget (0 = unbounded).
    pub fn new(cache_bytes: u64) -> Self {
        Self {
            lru: Mutex::new(None),
            cache_bytes,
        }
    }

    pub fn add(&self, key: &str, value: ByteView) {
        let mut guard = self.lru.lock();
        guard
            .get_or_insert_with(|| LruCache::new(self.cache_bytes, None))
            .add(key, value);
    }

    pub fn get(&self, key: &str) -> Option<ByteView> {
        let mut guard = self.lru.lock();
        guard.as_mut()?.get(key).cloned()
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.lru.lock().as_ref().map_or(0, LruCache::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Bytes currently held, keys included.
    pub fn bytes(&self) -> u64 {
        self.lru.lock().as_ref().map_or(0, LruCache::bytes)
    }

    #[cfg(test)]
    pub(crate) fn is_allocated(&self) -> bool {
        self.lru.lock().is_some()
    }
}
