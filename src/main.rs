//! dcache - A distributed read-through cache node
//!
//! Serves the `scores` group over the peer protocol and, optionally, the
//! frontend API.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use dcache::api::{create_api_router, create_peer_router, ApiState, AppState};
use dcache::{Config, GetterFn, Group, GroupRegistry, HttpPool, HttpPoolOptions};

/// Stand-in for a slow database.
const DB: &[(&str, &str)] = &[("Tom", "630"), ("Jack", "589"), ("Sam", "567")];

fn create_group(registry: &GroupRegistry, cache_bytes: u64) -> Arc<Group> {
    registry.new_group(
        "scores",
        cache_bytes,
        GetterFn(|key: &str| -> anyhow::Result<Vec<u8>> {
            info!(key, "[SlowDB] search key");
            DB.iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.as_bytes().to_vec())
                .ok_or_else(|| anyhow::anyhow!("{} not exist", key))
        }),
    )
}

/// Main entry point for a cache node.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Create the `scores` group and the HTTP peer pool
/// 4. Optionally start the frontend API server
/// 5. Serve the peer protocol until SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dcache=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    info!(
        "Configuration loaded: self={}, peers={:?}, cache_bytes={}, replicas={}",
        config.self_addr, config.peers, config.cache_bytes, config.replicas
    );

    let registry = Arc::new(GroupRegistry::new());
    let group = create_group(&registry, config.cache_bytes);

    let pool = Arc::new(HttpPool::with_options(
        config.self_addr.clone(),
        HttpPoolOptions {
            base_path: config.base_path.clone(),
            replicas: config.replicas,
            hash: None,
            timeout: config.peer_timeout,
        },
    )?);
    pool.set(&config.peers);
    group.register_peers(pool.clone());

    if config.api {
        let app = create_api_router(ApiState::new(Arc::clone(&group), Arc::clone(&registry)));
        let addr = SocketAddr::from(([0, 0, 0, 0], config.api_port));
        tokio::spawn(async move {
            match tokio::net::TcpListener::bind(addr).await {
                Ok(listener) => {
                    info!("Frontend server is running at http://{}", addr);
                    if let Err(e) = axum::serve(listener, app).await {
                        warn!("Frontend server stopped: {}", e);
                    }
                }
                Err(e) => warn!("Frontend server failed to bind {}: {}", addr, e),
            }
        });
    }

    let app = create_peer_router(
        AppState::new(Arc::clone(&registry), pool.self_addr()),
        pool.base_path(),
    );
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("dcache is running at {}", config.self_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }
}
