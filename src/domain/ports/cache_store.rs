//! Cache store port.

use std::time::Duration;

use async_trait::async_trait;

use crate::domain::errors::GatewayResult;

/// Key-value cache store with per-key expiry.
///
/// A miss is `Ok(None)`; a store that cannot be reached is
/// `Err(GatewayError::CacheUnavailable)`. The distinction matters: the
/// repository falls through to the upstream on either, but only the latter
/// is a degradation worth logging, and callers must never mistake an
/// unreachable store for "not cached".
///
/// Values are JSON strings; the repository owns the codec. Implementations
/// are expected to bound every operation with a short timeout.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Read a value. `Ok(None)` when absent or expired.
    async fn get(&self, key: &str) -> GatewayResult<Option<String>>;

    /// Write a value with the given time-to-live.
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> GatewayResult<()>;

    /// Remove a key. Removing an absent key is not an error.
    async fn delete(&self, key: &str) -> GatewayResult<()>;

    /// Whether an unexpired entry exists for the key.
    async fn exists(&self, key: &str) -> GatewayResult<bool>;

    /// Liveness probe for health reporting.
    async fn ping(&self) -> GatewayResult<()>;
}
