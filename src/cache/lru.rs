//! LRU Cache Module
//!
//! Byte-bounded Least Recently Used cache. Capacity is measured in bytes
//! of keys plus values, not in entries. Not safe for concurrent access;
//! see `LocalCache` for the locked wrapper.

use std::collections::HashMap;
use std::fmt;

// == Value Contract ==
/// Anything stored in the cache must report its own size in bytes.
pub trait Value {
    fn size(&self) -> usize;
}

/// Callback fired with the key and value of every entry leaving the cache.
pub type OnEvicted<V> = Box<dyn FnMut(&str, &V) + Send>;

// == List Node ==
#[derive(Debug)]
struct Node<V> {
    key: String,
    value: V,
    prev: Option<usize>,
    next: Option<usize>,
}

// == LRU Cache ==
/// Recency-ordered store evicting the least recently used entries once the
/// tracked byte total exceeds `max_bytes`.
///
/// Entries live in a vector and are chained into a doubly linked list by
/// index:
/// - `head` = Most recently used
/// - `tail` = Least recently used
pub struct LruCache<V: Value> {
    /// Byte budget, 0 = unbounded
    max_bytes: u64,
    /// Sum of `key.len() + value.size()` over all entries
    nbytes: u64,
    nodes: Vec<Node<V>>,
    /// Key -> position in `nodes`
    index: HashMap<String, usize>,
    head: Option<usize>,
    tail: Option<usize>,
    on_evicted: Option<OnEvicted<V>>,
}

impl<V: Value> LruCache<V> {
    // == Constructor ==
    /// Creates an empty cache holding at most `max_bytes` bytes (0 = unbounded).
    pub fn new(max_bytes: u64, on_evicted: Option<OnEvicted<V>>) -> Self {
        Self {
            max_bytes,
            nbytes: 0,
            nodes: Vec::new(),
            index: HashMap::new(),
            head: None,
            tail: None,
            on_evicted,
        }
    }

    // == Add ==
    /// Inserts or replaces a value and marks the key most recently used,
    /// then evicts from the tail until the byte budget holds.
    pub fn add(&mut self, key: impl Into<String>, value: V) {
        let key = key.into();

        if let Some(&idx) = self.index.get(&key) {
            self.detach(idx);
            self.attach_front(idx);
            let node = &mut self.nodes[idx];
            self.nbytes = self.nbytes - node.value.size() as u64 + value.size() as u64;
            node.value = value;
        } else {
            self.nbytes += (key.len() + value.size()) as u64;
            let idx = self.nodes.len();
            self.nodes.push(Node {
                key: key.clone(),
                value,
                prev: None,
                next: None,
            });
            self.index.insert(key, idx);
            self.attach_front(idx);
        }

        while self.max_bytes != 0 && self.max_bytes < self.nbytes {
            if self.remove_oldest().is_none() {
                break;
            }
        }
    }

    // == Get ==
    /// Looks up a key, marking it most recently used on a hit.
    pub fn get(&mut self, key: &str) -> Option<&V> {
        let idx = *self.index.get(key)?;
        self.detach(idx);
        self.attach_front(idx);
        Some(&self.nodes[idx].value)
    }

    // == Remove Oldest ==
    /// Removes and returns the least recently used entry.
    ///
    /// Returns None if the cache is empty.
    pub fn remove_oldest(&mut self) -> Option<(String, V)> {
        let idx = self.tail?;
        Some(self.evict(idx))
    }

    // == Remove ==
    /// Removes a key directly, returning its value if present.
    pub fn remove(&mut self, key: &str) -> Option<V> {
        let idx = *self.index.get(key)?;
        Some(self.evict(idx).1)
    }

    // == Length ==
    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Bytes currently tracked against the budget.
    pub fn bytes(&self) -> u64 {
        self.nbytes
    }

    pub fn max_bytes(&self) -> u64 {
        self.max_bytes
    }

    // == Internals ==
    fn evict(&mut self, idx: usize) -> (String, V) {
        let node = self.take(idx);
        self.nbytes -= (node.key.len() + node.value.size()) as u64;
        if let Some(callback) = self.on_evicted.as_mut() {
            callback(&node.key, &node.value);
        }
        (node.key, node.value)
    }

    /// Unlinks the node at `idx` and removes it from storage. The last node
    /// is swapped into the freed slot, so its neighbours and index entry
    /// are repointed.
    fn take(&mut self, idx: usize) -> Node<V> {
        self.detach(idx);
        let node = self.nodes.swap_remove(idx);
        self.index.remove(&node.key);

        if idx < self.nodes.len() {
            let (prev, next) = (self.nodes[idx].prev, self.nodes[idx].next);
            match prev {
                Some(p) => self.nodes[p].next = Some(idx),
                None => self.head = Some(idx),
            }
            match next {
                Some(n) => self.nodes[n].prev = Some(idx),
                None => self.tail = Some(idx),
            }
            if let Some(slot) = self.index.get_mut(&self.nodes[idx].key) {
                *slot = idx;
            }
        }

        node
    }

    fn detach(&mut self, idx: usize) {
        let (prev, next) = (self.nodes[idx].prev, self.nodes[idx].next);
        match prev {
            Some(p) => self.nodes[p].next = next,
            None => self.head = next,
        }
        match next {
            Some(n) => self.nodes[n].prev = prev,
            None => self.tail = prev,
        }
        self.nodes[idx].prev = None;
        self.nodes[idx].next = None;
    }

    fn attach_front(&mut self, idx: usize) {
        let old_head = self.head;
        self.nodes[idx].prev = None;
        self.nodes[idx].next = old_head;
        match old_head {
            Some(h) => self.nodes[h].prev = Some(idx),
            None => self.tail = Some(idx),
        }
        self.head = Some(idx);
    }

    /// Keys from most to least recently used.
    #[cfg(test)]
    pub(crate) fn keys_by_recency(&self) -> Vec<String> {
        let mut keys = Vec::with_capacity(self.nodes.len());
        let mut cursor = self.head;
        while let Some(idx) = cursor {
            keys.push(self.nodes[idx].key.clone());
            cursor = self.nodes[idx].next;
        }
        keys
    }

    /// Looks up a key without touching its recency.
    #[cfg(test)]
    pub(crate) fn peek(&self, key: &str) -> Option<&V> {
        self.index.get(key).map(|&idx| &self.nodes[idx].value)
    }
}

impl<V: Value> fmt::Debug for LruCache<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruCache")
            .field("max_bytes", &self.max_bytes)
            .field("nbytes", &self.nbytes)
            .field("len", &self.nodes.len())
            .finish()
    }
}
