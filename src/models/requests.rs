//! Request DTOs for the frontend API
//!
//! Defines the structure of incoming query strings.

use serde::Deserialize;

/// Query string of the lookup endpoint (GET /api?key=...)
///
/// A missing `key` deserializes to an empty string, which the group then
/// rejects as a validation fault.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiQuery {
    /// The key to look up
    #[serde(default)]
    pub key: String,
}
