//! Group Statistics Module
//!
//! Counters describing how a group's requests were served.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

// == Group Stats ==
/// Live counters owned by a group, updated without locking.
#[derive(Debug, Default)]
pub struct GroupStats {
    gets: AtomicU64,
    cache_hits: AtomicU64,
    peer_loads: AtomicU64,
    peer_errors: AtomicU64,
    local_loads: AtomicU64,
    local_load_errs: AtomicU64,
}

impl GroupStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_get(&self) {
        self.gets.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_hit(&self) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_peer_load(&self) {
        self.peer_loads.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_peer_error(&self) {
        self.peer_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_local_load(&self) {
        self.local_loads.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_local_load_err(&self) {
        self.local_load_errs.fetch_add(1, Ordering::Relaxed);
    }

    /// Copies the counters into a serializable snapshot.
    pub fn snapshot(&self) -> CacheStats {
        CacheStats {
            gets: self.gets.load(Ordering::Relaxed),
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            peer_loads: self.peer_loads.load(Ordering::Relaxed),
            peer_errors: self.peer_errors.load(Ordering::Relaxed),
            local_loads: self.local_loads.load(Ordering::Relaxed),
            local_load_errs: self.local_load_errs.load(Ordering::Relaxed),
            ..CacheStats::default()
        }
    }
}

// == Cache Stats ==
/// Point-in-time view of a group's counters and local cache usage.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CacheStats {
    /// Calls to `Group::get`, including rejected ones
    pub gets: u64,
    /// Requests served from the local cache
    pub cache_hits: u64,
    /// Requests served by a remote peer
    pub peer_loads: u64,
    /// Peer fetches that failed and fell back to the data source
    pub peer_errors: u64,
    /// Successful data source loads
    pub local_loads: u64,
    /// Failed data source loads
    pub local_load_errs: u64,
    /// Entries in the local cache
    pub cache_entries: usize,
    /// Bytes held by the local cache
    pub cache_bytes: u64,
}

impl CacheStats {
    // == Hit Rate ==
    /// Returns cache_hits / gets, or 0.0 if no requests have been made.
    pub fn hit_rate(&self) -> f64 {
        if self.gets == 0 {
            0.0
        } else {
            self.cache_hits as f64 / self.gets as f64
        }
    }
}
