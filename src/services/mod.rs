//! Core services: key derivation, caching repository, query dispatch,
//! battle comparison.

pub mod comparison;
pub mod dispatcher;
pub mod keys;
pub mod repository;

pub use dispatcher::{Operation, QueryDispatcher};
pub use repository::EntityRepository;
