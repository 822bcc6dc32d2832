//! Configuration Module
//!
//! Handles loading node configuration from environment variables.

use std::env;
use std::time::Duration;

use crate::peers::{DEFAULT_BASE_PATH, DEFAULT_REPLICAS};

/// Node configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Port the peer protocol listens on
    pub port: u16,
    /// This node's base URL as it appears in `peers`
    pub self_addr: String,
    /// Base URLs of every node in the fleet, this one included
    pub peers: Vec<String>,
    /// Whether to also start the frontend API server
    pub api: bool,
    /// Frontend API server port
    pub api_port: u16,
    /// Byte budget of each group's local cache (0 = unbounded)
    pub cache_bytes: u64,
    /// URL prefix of the peer protocol
    pub base_path: String,
    /// Virtual nodes per peer on the hash ring
    pub replicas: usize,
    /// Timeout for peer fetches, None = transport default
    pub peer_timeout: Option<Duration>,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `DCACHE_PORT` - Peer protocol port (default: 8001)
    /// - `DCACHE_SELF` - This node's base URL (default: `http://localhost:<port>`)
    /// - `DCACHE_PEERS` - Comma-separated peer base URLs (default: localhost 8001-8003)
    /// - `DCACHE_API` - Start the frontend API server (default: false)
    /// - `DCACHE_API_PORT` - Frontend API port (default: 9999)
    /// - `DCACHE_CACHE_BYTES` - Local cache byte budget (default: 2048)
    /// - `DCACHE_BASE_PATH` - Peer protocol prefix (default: `/_geecache/`)
    /// - `DCACHE_REPLICAS` - Virtual nodes per peer (default: 50)
    /// - `DCACHE_PEER_TIMEOUT_MS` - Peer fetch timeout in milliseconds (default: unset)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let port = parse_var("DCACHE_PORT").unwrap_or(defaults.port);

        Self {
            port,
            self_addr: env::var("DCACHE_SELF")
                .unwrap_or_else(|_| format!("http://localhost:{}", port)),
            peers: env::var("DCACHE_PEERS")
                .map(|v| parse_peer_list(&v))
                .unwrap_or(defaults.peers),
            api: env::var("DCACHE_API")
                .map(|v| matches!(v.as_str(), "1" | "true" | "yes"))
                .unwrap_or(defaults.api),
            api_port: parse_var("DCACHE_API_PORT").unwrap_or(defaults.api_port),
            cache_bytes: parse_var("DCACHE_CACHE_BYTES").unwrap_or(defaults.cache_bytes),
            base_path: env::var("DCACHE_BASE_PATH").unwrap_or(defaults.base_path),
            replicas: parse_var("DCACHE_REPLICAS").unwrap_or(defaults.replicas),
            peer_timeout: parse_var("DCACHE_PEER_TIMEOUT_MS").map(Duration::from_millis),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8001,
            self_addr: "http://localhost:8001".to_string(),
            peers: vec![
                "http://localhost:8001".to_string(),
                "http://localhost:8002".to_string(),
                "http://localhost:8003".to_string(),
            ],
            api: false,
            api_port: 9999,
            cache_bytes: 2 << 10,
            base_path: DEFAULT_BASE_PATH.to_string(),
            replicas: DEFAULT_REPLICAS,
            peer_timeout: None,
        }
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}

fn parse_peer_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}
