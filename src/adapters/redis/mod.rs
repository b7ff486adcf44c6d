//! Redis cache store adapter.

pub mod store;

pub use store::RedisCacheStore;
