//! Ports: the seams between the core and its external collaborators.

pub mod cache_store;
pub mod upstream;

pub use cache_store::CacheStore;
pub use upstream::UpstreamSource;
