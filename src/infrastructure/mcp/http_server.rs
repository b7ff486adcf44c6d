//! HTTP MCP server for the Pokemon data gateway.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::routing::{get, post};
use axum::Router;
use tracing::info;

use crate::adapters::pokeapi::PokeApiClient;
use crate::adapters::redis::RedisCacheStore;
use crate::domain::models::Config;
use crate::domain::ports::{CacheStore, UpstreamSource};
use crate::services::{EntityRepository, QueryDispatcher};

use super::handlers::{handle_gateway_request, handle_health, AppState};

/// Wire the core components from configuration.
///
/// Fails fast when the cache store cannot be reached at startup; outages
/// after startup degrade per the repository's fallback policy instead.
pub async fn build_state(config: &Config) -> Result<AppState> {
    let cache: Arc<dyn CacheStore> = Arc::new(
        RedisCacheStore::connect(&config.cache)
            .await
            .context("Failed to connect to the cache store")?,
    );
    let upstream: Arc<dyn UpstreamSource> = Arc::new(
        PokeApiClient::new(&config.upstream).context("Failed to build the upstream client")?,
    );

    let repository = Arc::new(EntityRepository::new(
        cache,
        upstream,
        config.cache.key_prefix.clone(),
        Duration::from_secs(config.cache.ttl_secs),
    ));

    Ok(AppState {
        dispatcher: Arc::new(QueryDispatcher::new(repository)),
    })
}

/// Routes: JSON-RPC at `/`, health report at `/health`.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", post(handle_gateway_request))
        .route("/health", get(handle_health))
        .with_state(state)
}

/// Start the gateway server and serve until shutdown.
pub async fn start_server(config: Config) -> Result<()> {
    info!(
        upstream = %config.upstream.base_url,
        cache = %config.cache.url,
        ttl_secs = config.cache.ttl_secs,
        "starting pokegate"
    );

    let state = build_state(&config).await?;
    let app = build_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context(format!("Failed to bind {addr}"))?;

    info!(%addr, "gateway listening");

    axum::serve(listener, app).await?;

    Ok(())
}
