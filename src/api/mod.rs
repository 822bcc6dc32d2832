//! API Module
//!
//! HTTP handlers and routing for the peer protocol and the frontend API.
//!
//! # Peer endpoints
//! - `GET <base_path><group>/<key>` - Serve a cached value to another node
//!
//! # Frontend endpoints
//! - `GET /api?key=<key>` - Look a key up through the frontend group
//! - `GET /stats` - Per-group statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::{create_api_router, create_peer_router};
