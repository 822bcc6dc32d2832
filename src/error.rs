//! Error types for the distributed cache
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for groups, peers and the HTTP surface.
#[derive(Error, Debug)]
pub enum CacheError {
    /// `Group::get` was called with an empty key
    #[error("key is required")]
    EmptyKey,

    /// Inbound peer request did not have the `<group>/<key>` shape
    #[error("bad request: {0}")]
    BadRequest(String),

    /// No group registered under this name
    #[error("no such group: {0}")]
    NoSuchGroup(String),

    /// The data source failed; the message is passed through untouched
    #[error(transparent)]
    Load(anyhow::Error),

    /// Fetching from a remote peer failed
    #[error("peer fetch failed: {0}")]
    Remote(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<reqwest::Error> for CacheError {
    fn from(err: reqwest::Error) -> Self {
        CacheError::Remote(err.to_string())
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::EmptyKey | CacheError::BadRequest(_) => StatusCode::BAD_REQUEST,
            CacheError::NoSuchGroup(_) => StatusCode::NOT_FOUND,
            CacheError::Load(_) | CacheError::Remote(_) | CacheError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache.
pub type Result<T> = std::result::Result<T, CacheError>;
