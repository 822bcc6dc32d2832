//! Cache Module
//!
//! Byte-bounded LRU storage, the immutable value type and the locked
//! per-group wrapper.

mod byteview;
mod local;
mod lru;
mod stats;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use byteview::ByteView;
pub use local::LocalCache;
pub use lru::{LruCache, OnEvicted, Value};
pub use stats::{CacheStats, GroupStats};
