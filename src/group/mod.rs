//! Group Module
//!
//! A group is a named cache namespace: a local LRU, a data source to fall
//! back on and, optionally, a peer picker for keys owned by other nodes.
//!
//! # Lookup order
//! 1. Local cache
//! 2. The peer owning the key, if a picker is registered and picks one
//! 3. The data source; the result is cached locally

mod getter;
mod registry;

use std::fmt;
use std::sync::{Arc, OnceLock};

use tracing::{debug, info, warn};

use crate::cache::{ByteView, CacheStats, GroupStats, LocalCache};
use crate::error::{CacheError, Result};
use crate::peers::{PeerGetter, PeerPicker};

pub use getter::{Getter, GetterFn};
pub use registry::GroupRegistry;

// == Group ==
pub struct Group {
    name: String,
    getter: Arc<dyn Getter>,
    main_cache: LocalCache,
    peers: OnceLock<Arc<dyn PeerPicker>>,
    stats: GroupStats,
}

impl Group {
    /// Creates an unregistered group. Most callers want
    /// `GroupRegistry::new_group` instead.
    pub fn new<G>(name: impl Into<String>, cache_bytes: u64, getter: G) -> Self
    where
        G: Getter + 'static,
    {
        Self {
            name: name.into(),
            getter: Arc::new(getter),
            main_cache: LocalCache::new(cache_bytes),
            peers: OnceLock::new(),
            stats: GroupStats::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    // == Register Peers ==
    /// Attaches the peer picker used for keys this node does not own.
    ///
    /// # Panics
    /// If a picker has already been registered for this group.
    pub fn register_peers(&self, peers: Arc<dyn PeerPicker>) {
        if self.peers.set(peers).is_err() {
            panic!("register_peers called more than once for group {}", self.name);
        }
    }

    // == Get ==
    /// Returns the value for `key`, loading it on a local miss.
    pub async fn get(&self, key: &str) -> Result<ByteView> {
        self.stats.record_get();
        if key.is_empty() {
            return Err(CacheError::EmptyKey);
        }

        if let Some(value) = self.main_cache.get(key) {
            self.stats.record_hit();
            debug!(group = %self.name, key, "cache hit");
            return Ok(value);
        }

        self.load(key).await
    }

    /// Snapshot of the request counters and local cache usage.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            cache_entries: self.main_cache.len(),
            cache_bytes: self.main_cache.bytes(),
            ..self.stats.snapshot()
        }
    }

    // A single attempt against the owning peer; any failure falls back to
    // the data source.
    async fn load(&self, key: &str) -> Result<ByteView> {
        if let Some(peer) = self.peers.get().and_then(|picker| picker.pick_peer(key)) {
            match self.get_from_peer(peer.as_ref(), key).await {
                Ok(value) => {
                    self.stats.record_peer_load();
                    return Ok(value);
                }
                Err(err) => {
                    self.stats.record_peer_error();
                    warn!(group = %self.name, key, error = %err, "failed to get from peer");
                }
            }
        }

        self.get_locally(key).await
    }

    async fn get_locally(&self, key: &str) -> Result<ByteView> {
        info!(group = %self.name, key, "loading from data source");
        let bytes = match self.getter.get(key).await {
            Ok(bytes) => bytes,
            Err(err) => {
                self.stats.record_local_load_err();
                return Err(CacheError::Load(err));
            }
        };

        self.stats.record_local_load();
        let value = ByteView::from(bytes);
        self.populate_cache(key, value.clone());
        Ok(value)
    }

    // Values served by a peer are not cached here; the owner caches them.
    async fn get_from_peer(&self, peer: &dyn PeerGetter, key: &str) -> Result<ByteView> {
        let bytes = peer.get(&self.name, key).await?;
        Ok(ByteView::from(bytes))
    }

    fn populate_cache(&self, key: &str, value: ByteView) {
        self.main_cache.add(key, value);
    }

    #[cfg(test)]
    pub(crate) fn cached(&self, key: &str) -> Option<ByteView> {
        self.main_cache.get(key)
    }
}

impl fmt::Debug for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Group")
            .field("name", &self.name)
            .field("main_cache", &self.main_cache)
            .field("has_peers", &self.peers.get().is_some())
            .finish()
    }
}
