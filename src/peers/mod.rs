//! Peers Module
//!
//! Capabilities a group uses to find the peer owning a key and to fetch a
//! value from it, plus the HTTP implementation of both.

mod http;

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::Result;

pub use http::{HttpGetter, HttpPool, HttpPoolOptions};

/// Default URL prefix of the peer protocol.
pub const DEFAULT_BASE_PATH: &str = "/_geecache/";

/// Default number of virtual nodes per peer.
pub const DEFAULT_REPLICAS: usize = 50;

// == Peer Picker ==
/// Locates the peer responsible for a key.
pub trait PeerPicker: Send + Sync {
    /// Returns the remote peer owning `key`, or None when the key belongs
    /// to this node or no peers are known.
    fn pick_peer(&self, key: &str) -> Option<Arc<dyn PeerGetter>>;
}

// == Peer Getter ==
/// Fetches a value from one specific remote peer.
#[async_trait]
pub trait PeerGetter: Send + Sync {
    async fn get(&self, group: &str, key: &str) -> Result<Bytes>;
}
