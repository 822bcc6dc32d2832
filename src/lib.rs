//! dcache - A distributed read-through cache
//!
//! Every node keeps a byte-bounded LRU per group. On a miss the key is
//! fetched from the peer that owns it on a consistent hash ring, or loaded
//! from the group's data source when this node owns it or the peer fails.

pub mod api;
pub mod cache;
pub mod config;
pub mod consistenthash;
pub mod error;
pub mod group;
pub mod models;
pub mod peers;

pub use api::{ApiState, AppState};
pub use cache::ByteView;
pub use config::Config;
pub use error::{CacheError, Result};
pub use group::{Getter, GetterFn, Group, GroupRegistry};
pub use peers::{HttpPool, HttpPoolOptions, PeerGetter, PeerPicker};
