//! PokeAPI upstream client adapter.

pub mod client;
pub mod normalize;
pub mod retry;

pub use client::PokeApiClient;
pub use retry::RetryPolicy;
