//! HTTP Peer Pool
//!
//! Picks peers through a consistent hash ring and fetches values from them
//! over HTTP. The serving side lives in `api::handlers::peer_handler`.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::Mutex;
use tracing::debug;

use crate::consistenthash::{HashFn, HashRing};
use crate::error::{CacheError, Result};
use crate::peers::{PeerGetter, PeerPicker, DEFAULT_BASE_PATH, DEFAULT_REPLICAS};

// == Options ==
/// Tuning knobs for an `HttpPool`.
#[derive(Debug, Clone)]
pub struct HttpPoolOptions {
    /// URL prefix of the peer protocol, with leading and trailing slash
    pub base_path: String,
    /// Virtual nodes per peer
    pub replicas: usize,
    /// Ring hash, CRC-32 when None
    pub hash: Option<HashFn>,
    /// Whole-request timeout for peer fetches, None = transport default
    pub timeout: Option<Duration>,
}

impl Default for HttpPoolOptions {
    fn default() -> Self {
        Self {
            base_path: DEFAULT_BASE_PATH.to_string(),
            replicas: DEFAULT_REPLICAS,
            hash: None,
            timeout: None,
        }
    }
}

#[derive(Debug)]
struct PoolState {
    ring: HashRing,
    getters: HashMap<String, Arc<HttpGetter>>,
}

// == HTTP Pool ==
/// The set of HTTP peers this node knows about.
#[derive(Debug)]
pub struct HttpPool {
    /// This node's base URL, e.g. "http://localhost:8001"
    self_addr: String,
    opts: HttpPoolOptions,
    client: reqwest::Client,
    state: Mutex<PoolState>,
}

impl HttpPool {
    /// Creates a pool with default options.
    pub fn new(self_addr: impl Into<String>) -> Result<Self> {
        Self::with_options(self_addr, HttpPoolOptions::default())
    }

    pub fn with_options(self_addr: impl Into<String>, opts: HttpPoolOptions) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = opts.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| CacheError::Internal(format!("building peer client: {}", e)))?;

        Ok(Self {
            self_addr: self_addr.into(),
            state: Mutex::new(PoolState {
                ring: HashRing::new(opts.replicas, opts.hash),
                getters: HashMap::new(),
            }),
            opts,
            client,
        })
    }

    pub fn self_addr(&self) -> &str {
        &self.self_addr
    }

    pub fn base_path(&self) -> &str {
        &self.opts.base_path
    }

    // == Set ==
    /// Replaces the peer list. The ring and the per-peer getters are
    /// rebuilt from scratch.
    pub fn set<S: AsRef<str>>(&self, peers: &[S]) {
        let mut ring = HashRing::new(self.opts.replicas, self.opts.hash);
        ring.add(peers);

        let getters = peers
            .iter()
            .map(|peer| {
                let peer = peer.as_ref();
                let getter = HttpGetter::new(
                    format!("{}{}", peer, self.opts.base_path),
                    self.client.clone(),
                );
                (peer.to_string(), Arc::new(getter))
            })
            .collect();

        *self.state.lock() = PoolState { ring, getters };
    }
}

impl PeerPicker for HttpPool {
    fn pick_peer(&self, key: &str) -> Option<Arc<dyn PeerGetter>> {
        let state = self.state.lock();
        let peer = state.ring.get(key)?;
        if peer == self.self_addr {
            return None;
        }

        debug!(server = %self.self_addr, peer, "pick peer");
        let getter = state.getters.get(peer)?;
        Some(Arc::clone(getter) as Arc<dyn PeerGetter>)
    }
}

// == HTTP Getter ==
/// Fetches values from one peer.
#[derive(Debug, Clone)]
pub struct HttpGetter {
    /// Peer address plus base path, e.g. "http://localhost:8002/_geecache/"
    base_url: String,
    client: reqwest::Client,
}

impl HttpGetter {
    pub fn new(base_url: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            base_url: base_url.into(),
            client,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url_for(&self, group: &str, key: &str) -> String {
        format!(
            "{}{}/{}",
            self.base_url,
            urlencoding::encode(group),
            urlencoding::encode(key)
        )
    }
}

#[async_trait]
impl PeerGetter for HttpGetter {
    async fn get(&self, group: &str, key: &str) -> Result<Bytes> {
        let res = self.client.get(self.url_for(group, key)).send().await?;

        if !res.status().is_success() {
            return Err(CacheError::Remote(format!(
                "server returned: {}",
                res.status()
            )));
        }

        res.bytes()
            .await
            .map_err(|e| CacheError::Remote(format!("reading response body: {}", e)))
    }
}
