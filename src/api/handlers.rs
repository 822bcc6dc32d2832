//! API Handlers
//!
//! HTTP request handlers for the peer protocol and the frontend API.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, Method},
    response::{IntoResponse, Response},
    Json,
};
use tracing::info;

use crate::cache::ByteView;
use crate::error::{CacheError, Result};
use crate::group::{Group, GroupRegistry};
use crate::models::{ApiQuery, GroupStatsResponse, HealthResponse, StatsResponse};

/// State of the peer protocol server.
#[derive(Clone)]
pub struct AppState {
    /// Groups this node can serve
    pub registry: Arc<GroupRegistry>,
    /// This node's base URL, used to tag log lines
    pub node: Arc<str>,
}

impl AppState {
    pub fn new(registry: Arc<GroupRegistry>, node: impl Into<String>) -> Self {
        Self {
            registry,
            node: Arc::from(node.into()),
        }
    }
}

/// State of the frontend API server.
#[derive(Clone)]
pub struct ApiState {
    /// Group answering `/api` lookups
    pub group: Arc<Group>,
    /// All groups, for `/stats`
    pub registry: Arc<GroupRegistry>,
}

impl ApiState {
    pub fn new(group: Arc<Group>, registry: Arc<GroupRegistry>) -> Self {
        Self { group, registry }
    }
}

fn octet_stream(view: ByteView) -> Response {
    (
        [(header::CONTENT_TYPE, "application/octet-stream")],
        view.byte_slice(),
    )
        .into_response()
}

/// Handler for GET `<base_path><group>/<key>`
///
/// Serves a value to another node. `path` is everything after the base
/// path, already percent-decoded; it is split once, so a key may itself
/// contain '/'. The bare base path carries no `path` and is rejected.
pub async fn peer_handler(
    State(state): State<AppState>,
    method: Method,
    path: Option<Path<String>>,
) -> Result<Response> {
    let path = path.map(|Path(path)| path).unwrap_or_default();
    info!(server = %state.node, %method, path = %path, "peer request");

    let (group_name, key) = path
        .split_once('/')
        .ok_or_else(|| CacheError::BadRequest(format!("expected <group>/<key>, got {}", path)))?;

    let group = state
        .registry
        .get_group(group_name)
        .ok_or_else(|| CacheError::NoSuchGroup(group_name.to_string()))?;

    let view = group.get(key).await?;
    Ok(octet_stream(view))
}

/// Handler for GET /api?key=...
///
/// Looks a key up through the frontend group and returns the raw bytes.
pub async fn api_handler(
    State(state): State<ApiState>,
    Query(query): Query<ApiQuery>,
) -> Result<Response> {
    let view = state.group.get(&query.key).await?;
    Ok(octet_stream(view))
}

/// Handler for GET /stats
///
/// Returns the counters of every registered group.
pub async fn stats_handler(State(state): State<ApiState>) -> Json<StatsResponse> {
    let groups = state
        .registry
        .names()
        .into_iter()
        .filter_map(|name| state.registry.get_group(&name))
        .map(|group| GroupStatsResponse::new(group.name(), group.stats()))
        .collect();

    Json(StatsResponse { groups })
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
