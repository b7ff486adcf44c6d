//! In-memory cache store adapter (tests and local development).

pub mod store;

pub use store::MemoryCacheStore;
