//! Storage domain - Key-value store abstraction the entity layer is built on

mod repository;

pub use repository::{KeyValueStore, StoredEntry};

#[cfg(test)]
pub use repository::mock;
