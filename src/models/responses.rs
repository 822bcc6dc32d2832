//! Response DTOs for the frontend API
//!
//! Defines the structure of outgoing JSON bodies. Cached values themselves
//! are always sent as raw bytes.

use serde::Serialize;

use crate::cache::CacheStats;

/// Statistics of one group (part of GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct GroupStatsResponse {
    /// Group name
    pub name: String,
    #[serde(flatten)]
    pub stats: CacheStats,
    /// Hit rate (cache_hits / gets)
    pub hit_rate: f64,
}

impl GroupStatsResponse {
    pub fn new(name: impl Into<String>, stats: CacheStats) -> Self {
        Self {
            name: name.into(),
            hit_rate: stats.hit_rate(),
            stats,
        }
    }
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// One entry per registered group, sorted by name
    pub groups: Vec<GroupStatsResponse>,
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
