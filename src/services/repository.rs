//! Caching repository over the cache store and upstream ports.
//!
//! Owns the cache-fill and staleness policy for every query:
//!
//! 1. Build the cache key.
//! 2. Try the cache store. A hit is returned as-is; an unreachable store is
//!    logged and treated as a miss (degraded mode).
//! 3. Fetch from upstream, write back best-effort with the configured TTL,
//!    return the record.
//!
//! Negative results are never cached, and a cache write failure never fails
//! the read. Upstream failures, after the client's own retries, are the
//! definitive answer for the request.

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::domain::errors::GatewayResult;
use crate::domain::models::{DomainRecord, EntityKind, Identifier, PageResult};
use crate::domain::ports::{CacheStore, UpstreamSource};
use crate::services::keys;

/// Repository answering record and page queries for every entity kind.
///
/// Stateless across requests; the only shared mutable resource is the
/// external cache store behind the port. Concurrent duplicate misses each
/// fetch independently; upstream reads are idempotent, so the last
/// write-back for a key wins without affecting correctness.
pub struct EntityRepository {
    cache: Arc<dyn CacheStore>,
    upstream: Arc<dyn UpstreamSource>,
    key_prefix: String,
    ttl: Duration,
}

impl EntityRepository {
    pub fn new(
        cache: Arc<dyn CacheStore>,
        upstream: Arc<dyn UpstreamSource>,
        key_prefix: impl Into<String>,
        ttl: Duration,
    ) -> Self {
        Self {
            cache,
            upstream,
            key_prefix: key_prefix.into(),
            ttl,
        }
    }

    /// Get a single record, serving from cache within the TTL window.
    pub async fn get_record(
        &self,
        kind: EntityKind,
        identifier: &Identifier,
    ) -> GatewayResult<DomainRecord> {
        let key = keys::record_key(&self.key_prefix, kind, identifier);

        if let Some(record) = self.cache_lookup::<DomainRecord>(&key).await {
            debug!(%key, "cache hit");
            return Ok(record);
        }

        let record = self.upstream.fetch_record(kind, identifier).await?;
        self.write_back(&key, &record).await;
        Ok(record)
    }

    /// Get one page of a list query, cached under its exact pagination.
    pub async fn get_page(
        &self,
        kind: EntityKind,
        offset: u32,
        limit: u32,
    ) -> GatewayResult<PageResult> {
        let key = keys::page_key(&self.key_prefix, kind, offset, limit);

        if let Some(page) = self.cache_lookup::<PageResult>(&key).await {
            debug!(%key, "cache hit");
            return Ok(page);
        }

        let page = self.upstream.fetch_page(kind, offset, limit).await?;
        self.write_back(&key, &page).await;
        Ok(page)
    }

    /// Whether the cache store currently answers a ping.
    pub async fn cache_reachable(&self) -> bool {
        self.cache.ping().await.is_ok()
    }

    /// Whether the upstream currently answers a ping.
    pub async fn upstream_reachable(&self) -> bool {
        self.upstream.ping().await.is_ok()
    }

    /// Cache read distinguishing hit, miss, and degraded store.
    ///
    /// Returns `Some(value)` only for a usable hit. An unreachable store
    /// degrades to a miss (logged); an entry that no longer deserializes is
    /// dropped and treated as a miss rather than failing the read.
    async fn cache_lookup<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = match self.cache.get(key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(err) => {
                warn!(%key, error = %err, "cache store unavailable, falling through to upstream");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(err) => {
                warn!(%key, error = %err, "dropping cache entry that failed to deserialize");
                if let Err(err) = self.cache.delete(key).await {
                    debug!(%key, error = %err, "could not drop stale cache entry");
                }
                None
            }
        }
    }

    /// Best-effort cache fill: attempted once, a failure is logged and
    /// swallowed so the already-fetched value still reaches the caller.
    async fn write_back<T: Serialize>(&self, key: &str, value: &T) {
        let raw = match serde_json::to_string(value) {
            Ok(raw) => raw,
            Err(err) => {
                warn!(%key, error = %err, "skipping cache fill, value failed to serialize");
                return;
            }
        };

        if let Err(err) = self.cache.set(key, &raw, self.ttl).await {
            warn!(%key, error = %err, "cache fill failed, serving uncached");
        }
    }
}
