//! Domain errors for the Pokemon data gateway.

use thiserror::Error;

use super::models::EntityKind;

/// Gateway-level errors.
///
/// Every failure surfaced by the query path is one of these kinds, so the
/// protocol boundary can map each to a stable, distinguishable response
/// code. `CacheUnavailable` is recoverable: the repository falls through to
/// the upstream instead of failing the request.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    #[error("{kind} not found: {identifier}")]
    NotFound { kind: EntityKind, identifier: String },

    #[error("Cache store unavailable: {0}")]
    CacheUnavailable(String),

    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("Upstream returned a malformed response: {0}")]
    UpstreamMalformed(String),
}

impl GatewayError {
    /// Whether a retry could plausibly succeed.
    ///
    /// Only `UpstreamUnavailable` (network failures, timeouts, 429/5xx) is
    /// transient. `NotFound` and `UpstreamMalformed` are definitive answers
    /// and must never be retried.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::UpstreamUnavailable(_))
    }
}

pub type GatewayResult<T> = Result<T, GatewayError>;
