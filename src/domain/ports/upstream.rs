//! Upstream data source port.

use async_trait::async_trait;

use crate::domain::errors::GatewayResult;
use crate::domain::models::{DomainRecord, EntityKind, Identifier, PageResult};

/// Read-only client for the authoritative Pokemon data source.
///
/// Implementations translate transport outcomes into the domain error
/// taxonomy: `NotFound` for a missing identifier, `UpstreamUnavailable`
/// for network failures/timeouts/5xx (retried internally with bounded
/// backoff before surfacing), `UpstreamMalformed` for responses that do
/// not parse into the expected shape.
#[async_trait]
pub trait UpstreamSource: Send + Sync {
    /// Fetch a single record by canonical identifier.
    async fn fetch_record(
        &self,
        kind: EntityKind,
        identifier: &Identifier,
    ) -> GatewayResult<DomainRecord>;

    /// Fetch one page of a list query. `items` preserve upstream order.
    async fn fetch_page(
        &self,
        kind: EntityKind,
        offset: u32,
        limit: u32,
    ) -> GatewayResult<PageResult>;

    /// Liveness probe for health reporting.
    async fn ping(&self) -> GatewayResult<()>;
}
