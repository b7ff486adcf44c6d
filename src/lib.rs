//! Pokegate - Pokemon Data Gateway
//!
//! Pokegate exposes Pokemon reference data through a fixed set of typed
//! query operations, backed by the PokeAPI and a freshness-bounded Redis
//! cache. The heart of the crate is the caching repository: for every
//! query it decides whether to serve from cache, fetch upstream, or both,
//! degrading gracefully when either side misbehaves.
//!
//! # Architecture
//!
//! - **Domain** (`domain`): models, error taxonomy, and ports
//! - **Services** (`services`): key builder, caching repository,
//!   dispatcher, battle comparison
//! - **Adapters** (`adapters`): Redis store, in-memory store, PokeAPI client
//! - **Infrastructure** (`infrastructure`): config loading, MCP HTTP surface

pub mod adapters;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::errors::{GatewayError, GatewayResult};
pub use domain::models::{
    Combatant, ComparisonReport, Config, DomainRecord, EntityKind, Identifier, PageResult,
    QueryOutcome, ResourceSummary,
};
pub use domain::ports::{CacheStore, UpstreamSource};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use services::{EntityRepository, Operation, QueryDispatcher};
