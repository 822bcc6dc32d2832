//! Consistent Hash Ring
//!
//! Maps keys to peers through a ring of virtual nodes. Every real peer owns
//! `replicas` points on the ring; a key belongs to the first point at or
//! after its own hash, wrapping around past the largest point.

use std::collections::HashMap;

/// Hash function used for both ring points and keys.
pub type HashFn = fn(&[u8]) -> u32;

// == Hash Ring ==
#[derive(Debug, Clone)]
pub struct HashRing {
    hash: HashFn,
    replicas: usize,
    /// Virtual node hashes, sorted ascending
    keys: Vec<u32>,
    /// Virtual node hash -> real peer
    hash_map: HashMap<u32, String>,
}

impl HashRing {
    /// Creates an empty ring. `hash` defaults to CRC-32 (IEEE).
    pub fn new(replicas: usize, hash: Option<HashFn>) -> Self {
        Self {
            hash: hash.unwrap_or(crc32fast::hash),
            replicas,
            keys: Vec::new(),
            hash_map: HashMap::new(),
        }
    }

    /// Adds peers to the ring, `replicas` virtual nodes each.
    ///
    /// Virtual node `i` of peer `p` is placed at `hash(format!("{i}{p}"))`.
    /// If two labels collide the later peer takes over the mapping while
    /// both positions stay in the sorted list.
    pub fn add<S: AsRef<str>>(&mut self, peers: &[S]) {
        for peer in peers {
            let peer = peer.as_ref();
            for i in 0..self.replicas {
                let hash = (self.hash)(format!("{}{}", i, peer).as_bytes());
                self.keys.push(hash);
                self.hash_map.insert(hash, peer.to_string());
            }
        }
        self.keys.sort_unstable();
    }

    /// Returns the peer owning `key`, or None when the ring is empty.
    pub fn get(&self, key: &str) -> Option<&str> {
        if self.keys.is_empty() {
            return None;
        }

        let hash = (self.hash)(key.as_bytes());
        let idx = self.keys.partition_point(|&k| k < hash);
        let point = self.keys[idx % self.keys.len()];
        self.hash_map.get(&point).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Number of virtual nodes on the ring.
    pub fn len(&self) -> usize {
        self.keys.len()
    }
}
