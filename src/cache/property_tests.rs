//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check the byte accounting and recency invariants of the
//! LRU cache and the determinism of the hash ring.

use proptest::prelude::*;
use std::collections::HashMap;

use crate::cache::{ByteView, LruCache, Value};
use crate::consistenthash::HashRing;

// == Strategies ==
/// Generates cache keys from a small alphabet so that updates happen often
fn key_strategy() -> impl Strategy<Value = String> {
    "[a-f]{1,3}".prop_map(|s| s)
}

fn value_strategy() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..32)
}

#[derive(Debug, Clone)]
enum CacheOp {
    Add { key: String, value: Vec<u8> },
    Get { key: String },
    Remove { key: String },
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        3 => (key_strategy(), value_strategy())
            .prop_map(|(key, value)| CacheOp::Add { key, value }),
        2 => key_strategy().prop_map(|key| CacheOp::Get { key }),
        1 => key_strategy().prop_map(|key| CacheOp::Remove { key }),
    ]
}

/// Recomputes the byte total from a shadow model of the live entries.
fn shadow_bytes(model: &HashMap<String, usize>) -> u64 {
    model.iter().map(|(k, v)| (k.len() + v) as u64).sum()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // After every add the tracked byte total stays within budget and
    // matches the exact sum over the entries still held.
    #[test]
    fn prop_capacity_invariant(
        max_bytes in 1u64..128,
        ops in prop::collection::vec(cache_op_strategy(), 1..200)
    ) {
        let mut lru: LruCache<ByteView> = LruCache::new(max_bytes, None);

        for op in ops {
            match op {
                CacheOp::Add { key, value } => {
                    lru.add(key, ByteView::from(value));
                    prop_assert!(lru.bytes() <= max_bytes);
                }
                CacheOp::Get { key } => {
                    let _ = lru.get(&key);
                }
                CacheOp::Remove { key } => {
                    let _ = lru.remove(&key);
                }
            }

            let keys = lru.keys_by_recency();
            prop_assert_eq!(keys.len(), lru.len());

            let mut model = HashMap::new();
            for key in keys {
                let size = lru.peek(&key).map(|v| v.size()).unwrap_or_default();
                model.insert(key, size);
            }
            prop_assert_eq!(lru.bytes(), shadow_bytes(&model));
        }
    }

    // Any key touched by get or add becomes the most recently used.
    #[test]
    fn prop_touch_promotes(
        ops in prop::collection::vec(cache_op_strategy(), 1..100)
    ) {
        let mut lru: LruCache<ByteView> = LruCache::new(0, None);

        for op in ops {
            match op {
                CacheOp::Add { key, value } => {
                    lru.add(key.clone(), ByteView::from(value));
                    let keys = lru.keys_by_recency();
                    prop_assert_eq!(keys.first(), Some(&key));
                }
                CacheOp::Get { key } => {
                    if lru.get(&key).is_some() {
                        let keys = lru.keys_by_recency();
                        prop_assert_eq!(keys.first(), Some(&key));
                    }
                }
                CacheOp::Remove { key } => {
                    let _ = lru.remove(&key);
                }
            }
        }
    }

    // Eviction always takes the tail of the recency order.
    #[test]
    fn prop_eviction_takes_least_recent(
        ops in prop::collection::vec(cache_op_strategy(), 1..100)
    ) {
        let mut lru: LruCache<ByteView> = LruCache::new(0, None);
        for op in ops {
            if let CacheOp::Add { key, value } = op {
                lru.add(key, ByteView::from(value));
            }
        }

        while !lru.is_empty() {
            let expected = lru.keys_by_recency().last().cloned();
            let evicted = lru.remove_oldest().map(|(k, _)| k);
            prop_assert_eq!(evicted, expected);
        }
        prop_assert_eq!(lru.bytes(), 0);
    }

    // Rings built from the same peers in the same order agree on every key.
    #[test]
    fn prop_ring_determinism(
        peers in prop::collection::hash_set("[a-z]{3,8}", 1..6),
        keys in prop::collection::vec("[ -~]{0,16}", 1..50)
    ) {
        let peers: Vec<String> = peers.into_iter().collect();
        let mut first = HashRing::new(10, None);
        let mut second = HashRing::new(10, None);
        first.add(&peers);
        second.add(&peers);

        for key in keys {
            let owner = first.get(&key);
            prop_assert!(owner.is_some());
            prop_assert_eq!(owner, first.get(&key));
            prop_assert_eq!(owner, second.get(&key));
        }
    }
}
