//! Domain models.

pub mod config;
pub mod entity;

pub use config::{
    CacheConfig, Config, LoggingConfig, RetryConfig, ServerConfig, UpstreamConfig,
};
pub use entity::{
    Combatant, ComparisonReport, DomainRecord, EntityKind, Identifier, PageResult, QueryOutcome,
    ResourceSummary,
};
