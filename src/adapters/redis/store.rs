//! Redis-backed cache store.

use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client};
use tracing::info;

use crate::domain::errors::{GatewayError, GatewayResult};
use crate::domain::models::CacheConfig;
use crate::domain::ports::CacheStore;

/// Cache store over a Redis instance.
///
/// Uses a multiplexed connection manager that reconnects after transient
/// outages; while the connection is down, operations fail fast as
/// `CacheUnavailable` and the repository degrades to upstream-only reads.
/// Every operation is bounded by the configured short timeout so a slow
/// store cannot stall the request path.
pub struct RedisCacheStore {
    conn: ConnectionManager,
    op_timeout: Duration,
}

impl RedisCacheStore {
    /// Connect to Redis and verify the connection with a `PING`.
    pub async fn connect(config: &CacheConfig) -> GatewayResult<Self> {
        let client = Client::open(config.url.as_str())
            .map_err(|err| GatewayError::CacheUnavailable(format!("invalid redis url: {err}")))?;

        let conn = client
            .get_connection_manager()
            .await
            .map_err(|err| GatewayError::CacheUnavailable(format!("redis connect: {err}")))?;

        let store = Self {
            conn,
            op_timeout: Duration::from_millis(config.op_timeout_ms),
        };
        store.ping().await?;

        info!(url = %config.url, "connected to redis cache store");
        Ok(store)
    }

    /// Run a cache operation under the per-op timeout.
    async fn bounded<T>(
        &self,
        op: &'static str,
        fut: impl std::future::Future<Output = redis::RedisResult<T>> + Send,
    ) -> GatewayResult<T> {
        match tokio::time::timeout(self.op_timeout, fut).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(err)) => Err(GatewayError::CacheUnavailable(format!("redis {op}: {err}"))),
            Err(_) => Err(GatewayError::CacheUnavailable(format!(
                "redis {op} timed out after {:?}",
                self.op_timeout
            ))),
        }
    }
}

#[async_trait]
impl CacheStore for RedisCacheStore {
    async fn get(&self, key: &str) -> GatewayResult<Option<String>> {
        let mut conn = self.conn.clone();
        let key = key.to_owned();
        self.bounded("GET", async move { conn.get(&key).await }).await
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> GatewayResult<()> {
        let mut conn = self.conn.clone();
        let key = key.to_owned();
        let value = value.to_owned();
        // Redis expiry has whole-second resolution; keep at least one
        // second so an entry is never written pre-expired.
        let secs = ttl.as_secs().max(1);
        self.bounded("SETEX", async move {
            conn.set_ex::<_, _, ()>(&key, &value, secs).await
        })
        .await
    }

    async fn delete(&self, key: &str) -> GatewayResult<()> {
        let mut conn = self.conn.clone();
        let key = key.to_owned();
        self.bounded("DEL", async move { conn.del::<_, ()>(&key).await })
            .await
    }

    async fn exists(&self, key: &str) -> GatewayResult<bool> {
        let mut conn = self.conn.clone();
        let key = key.to_owned();
        self.bounded("EXISTS", async move { conn.exists(&key).await })
            .await
    }

    async fn ping(&self) -> GatewayResult<()> {
        let mut conn = self.conn.clone();
        let pong: String = self
            .bounded("PING", async move {
                redis::cmd("PING").query_async(&mut conn).await
            })
            .await?;
        if pong == "PONG" {
            Ok(())
        } else {
            Err(GatewayError::CacheUnavailable(format!(
                "unexpected PING reply: {pong}"
            )))
        }
    }
}
