//! Integration Tests for the Peer Protocol
//!
//! Runs real nodes on ephemeral ports and checks ownership, delegation,
//! fallback and the HTTP status contract end to end.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use dcache::api::{create_peer_router, AppState};
use dcache::consistenthash::HashRing;
use dcache::peers::DEFAULT_REPLICAS;
use dcache::{GetterFn, Group, GroupRegistry, HttpPool, PeerPicker};
use tokio::net::TcpListener;

// == Helper Functions ==

struct Node {
    addr: String,
    group: Arc<Group>,
    loads: Arc<AtomicUsize>,
}

async fn bind() -> (TcpListener, String) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = format!("http://{}", listener.local_addr().unwrap());
    (listener, addr)
}

/// Starts a node serving a `scores` group whose loader answers
/// `value-of-<key>` and fails for keys starting with "missing".
fn start_node(listener: TcpListener, addr: &str, peers: &[String]) -> Node {
    let loads = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&loads);

    let registry = Arc::new(GroupRegistry::new());
    let group = registry.new_group(
        "scores",
        2 << 10,
        GetterFn(move |key: &str| -> anyhow::Result<Vec<u8>> {
            counter.fetch_add(1, Ordering::SeqCst);
            if key.starts_with("missing") {
                return Err(anyhow::anyhow!("{} not exist", key));
            }
            Ok(format!("value-of-{}", key).into_bytes())
        }),
    );

    let pool = Arc::new(HttpPool::new(addr).unwrap());
    pool.set(peers);
    group.register_peers(pool.clone() as Arc<dyn PeerPicker>);

    let app = create_peer_router(AppState::new(registry, addr), pool.base_path());
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    Node {
        addr: addr.to_string(),
        group,
        loads,
    }
}

async fn start_pair() -> (Node, Node, HashRing) {
    let (la, a) = bind().await;
    let (lb, b) = bind().await;
    let peers = vec![a.clone(), b.clone()];

    let mut ring = HashRing::new(DEFAULT_REPLICAS, None);
    ring.add(&peers);

    (start_node(la, &a, &peers), start_node(lb, &b, &peers), ring)
}

fn key_owned_by(ring: &HashRing, owner: &str, prefix: &str) -> String {
    (0..10_000)
        .map(|i| format!("{}-{}", prefix, i))
        .find(|k| ring.get(k) == Some(owner))
        .expect("no key maps to owner")
}

// == Delegation ==

#[tokio::test]
async fn test_remote_key_is_loaded_by_owner() {
    let (a, b, ring) = start_pair().await;
    let key = key_owned_by(&ring, &b.addr, "key");

    let view = a.group.get(&key).await.unwrap();
    assert_eq!(view.as_string(), format!("value-of-{}", key));
    assert_eq!(a.loads.load(Ordering::SeqCst), 0);
    assert_eq!(b.loads.load(Ordering::SeqCst), 1);

    // The owner caches it; asking again does not reload
    a.group.get(&key).await.unwrap();
    assert_eq!(b.loads.load(Ordering::SeqCst), 1);

    let stats = a.group.stats();
    assert_eq!(stats.peer_loads, 2);
    assert_eq!(stats.cache_entries, 0);
    assert_eq!(b.group.stats().cache_hits, 1);
}

#[tokio::test]
async fn test_local_key_is_loaded_locally() {
    let (a, b, ring) = start_pair().await;
    let key = key_owned_by(&ring, &a.addr, "key");

    a.group.get(&key).await.unwrap();
    assert_eq!(a.loads.load(Ordering::SeqCst), 1);
    assert_eq!(b.loads.load(Ordering::SeqCst), 0);
    assert_eq!(a.group.stats().cache_entries, 1);
}

#[tokio::test]
async fn test_owner_load_failure_falls_back_locally() {
    let (a, b, ring) = start_pair().await;
    let key = key_owned_by(&ring, &b.addr, "missing");

    let err = a.group.get(&key).await.unwrap_err();
    assert_eq!(err.to_string(), format!("{} not exist", key));

    // Owner tried once, then the caller tried its own source once
    assert_eq!(b.loads.load(Ordering::SeqCst), 1);
    assert_eq!(a.loads.load(Ordering::SeqCst), 1);
    assert_eq!(a.group.stats().peer_errors, 1);
}

#[tokio::test]
async fn test_unreachable_peer_falls_back_locally() {
    let (dead_listener, dead) = bind().await;
    drop(dead_listener);

    let (la, a) = bind().await;
    let peers = vec![a.clone(), dead.clone()];
    let node = start_node(la, &a, &peers);

    let mut ring = HashRing::new(DEFAULT_REPLICAS, None);
    ring.add(&peers);
    let key = key_owned_by(&ring, &dead, "key");

    let view = node.group.get(&key).await.unwrap();
    assert_eq!(view.as_string(), format!("value-of-{}", key));
    assert_eq!(node.loads.load(Ordering::SeqCst), 1);
    assert_eq!(node.group.stats().peer_errors, 1);
}

// == Wire Contract ==

#[tokio::test]
async fn test_status_codes() {
    let (_a, b, _) = start_pair().await;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/_geecache/scores/Tom", b.addr))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::OK);
    assert_eq!(
        res.headers()[reqwest::header::CONTENT_TYPE],
        "application/octet-stream"
    );
    assert_eq!(res.text().await.unwrap(), "value-of-Tom");

    let res = client
        .get(format!("{}/_geecache/scores", b.addr))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::BAD_REQUEST);

    let res = client
        .get(format!("{}/_geecache/unknown/Tom", b.addr))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::NOT_FOUND);

    let res = client
        .get(format!("{}/_geecache/scores/missing-1", b.addr))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::INTERNAL_SERVER_ERROR);
    assert!(res.text().await.unwrap().contains("missing-1 not exist"));
}

#[tokio::test]
async fn test_encoded_key_round_trips() {
    let (a, b, ring) = start_pair().await;
    let key = key_owned_by(&ring, &b.addr, "a b/c?d");

    let view = a.group.get(&key).await.unwrap();
    assert_eq!(view.as_string(), format!("value-of-{}", key));
    assert_eq!(b.loads.load(Ordering::SeqCst), 1);
}
