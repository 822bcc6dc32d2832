//! Data source capability
//!
//! A group falls back to its `Getter` whenever neither the local cache nor
//! a peer can serve a key.

use async_trait::async_trait;

/// Loads the authoritative value for a key.
///
/// Errors are handed back to the caller of `Group::get` unchanged.
#[async_trait]
pub trait Getter: Send + Sync {
    async fn get(&self, key: &str) -> anyhow::Result<Vec<u8>>;
}

/// Adapts a plain closure into a `Getter`.
///
/// ```ignore
/// let getter = GetterFn(|key: &str| Ok(key.as_bytes().to_vec()));
/// ```
pub struct GetterFn<F>(pub F);

#[async_trait]
impl<F> Getter for GetterFn<F>
where
    F: Fn(&str) -> anyhow::Result<Vec<u8>> + Send + Sync,
{
    async fn get(&self, key: &str) -> anyhow::Result<Vec<u8>> {
        (self.0)(key)
    }
}
