//! Shared test doubles for the gateway integration tests.

use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;

use pokegate::domain::errors::{GatewayError, GatewayResult};
use pokegate::domain::models::{DomainRecord, EntityKind, Identifier, PageResult, ResourceSummary};
use pokegate::domain::ports::{CacheStore, UpstreamSource};

/// Scripted upstream with per-method call counters.
///
/// Every `fetch_record` response embeds the call sequence number in the
/// payload, so a cached response is distinguishable from a refetched one.
#[derive(Default)]
pub struct StubUpstream {
    pub record_calls: AtomicU32,
    pub page_calls: AtomicU32,
    /// Identifiers that answer `NotFound`.
    pub missing: Vec<String>,
    /// Scripted base-stat totals, embedded as a one-entry stats array.
    pub stat_totals: Vec<(String, u64)>,
    /// Total record count reported by page queries.
    pub total_count: u32,
}

impl StubUpstream {
    pub fn new() -> Self {
        Self {
            total_count: 1_302,
            ..Self::default()
        }
    }

    pub fn with_missing(identifier: &str) -> Self {
        Self {
            missing: vec![identifier.to_string()],
            ..Self::new()
        }
    }

    pub fn with_stat_totals(totals: &[(&str, u64)]) -> Self {
        Self {
            stat_totals: totals
                .iter()
                .map(|(name, total)| ((*name).to_string(), *total))
                .collect(),
            ..Self::new()
        }
    }

    pub fn record_call_count(&self) -> u32 {
        self.record_calls.load(Ordering::SeqCst)
    }

    pub fn page_call_count(&self) -> u32 {
        self.page_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl UpstreamSource for StubUpstream {
    async fn fetch_record(
        &self,
        kind: EntityKind,
        identifier: &Identifier,
    ) -> GatewayResult<DomainRecord> {
        let fetch_seq = self.record_calls.fetch_add(1, Ordering::SeqCst) + 1;
        let canonical = identifier.canonical();

        if self.missing.contains(&canonical) {
            return Err(GatewayError::NotFound {
                kind,
                identifier: canonical,
            });
        }

        let mut payload = json!({
            "name": canonical,
            "fetch_seq": fetch_seq,
        });
        if let Some((_, total)) = self.stat_totals.iter().find(|(name, _)| *name == canonical) {
            payload["stats"] = json!([{"base_stat": total, "stat": {"name": "hp"}}]);
        }

        Ok(DomainRecord::new(kind, identifier, payload))
    }

    async fn fetch_page(
        &self,
        _kind: EntityKind,
        offset: u32,
        limit: u32,
    ) -> GatewayResult<PageResult> {
        self.page_calls.fetch_add(1, Ordering::SeqCst);

        let end = (offset + limit).min(self.total_count);
        let items = (offset..end)
            .map(|i| ResourceSummary {
                name: format!("mon-{i}"),
                url: format!("https://upstream.test/api/v2/pokemon/{i}/"),
            })
            .collect();

        Ok(PageResult {
            items,
            next_offset: (end < self.total_count).then_some(end),
            total_count: self.total_count,
        })
    }

    async fn ping(&self) -> GatewayResult<()> {
        Ok(())
    }
}

/// Cache store that is permanently unreachable.
pub struct UnreachableCacheStore;

#[async_trait]
impl CacheStore for UnreachableCacheStore {
    async fn get(&self, _key: &str) -> GatewayResult<Option<String>> {
        Err(GatewayError::CacheUnavailable("connection refused".into()))
    }

    async fn set(&self, _key: &str, _value: &str, _ttl: Duration) -> GatewayResult<()> {
        Err(GatewayError::CacheUnavailable("connection refused".into()))
    }

    async fn delete(&self, _key: &str) -> GatewayResult<()> {
        Err(GatewayError::CacheUnavailable("connection refused".into()))
    }

    async fn exists(&self, _key: &str) -> GatewayResult<bool> {
        Err(GatewayError::CacheUnavailable("connection refused".into()))
    }

    async fn ping(&self) -> GatewayResult<()> {
        Err(GatewayError::CacheUnavailable("connection refused".into()))
    }
}

/// Cache store whose reads work but whose writes always fail.
#[derive(Default)]
pub struct ReadOnlyCacheStore {
    pub write_attempts: AtomicU32,
}

impl ReadOnlyCacheStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CacheStore for ReadOnlyCacheStore {
    async fn get(&self, _key: &str) -> GatewayResult<Option<String>> {
        Ok(None)
    }

    async fn set(&self, _key: &str, _value: &str, _ttl: Duration) -> GatewayResult<()> {
        self.write_attempts.fetch_add(1, Ordering::SeqCst);
        Err(GatewayError::CacheUnavailable("read-only store".into()))
    }

    async fn delete(&self, _key: &str) -> GatewayResult<()> {
        Ok(())
    }

    async fn exists(&self, _key: &str) -> GatewayResult<bool> {
        Ok(false)
    }

    async fn ping(&self) -> GatewayResult<()> {
        Ok(())
    }
}
