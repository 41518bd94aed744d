//! Storage infrastructure - Key-value store implementations

mod factory;
mod in_memory;
mod postgres;

pub use factory::{StorageConfig, StorageFactory, StorageType};
pub use in_memory::InMemoryKeyValueStore;
pub use postgres::{PostgresConfig, PostgresKeyValueStore};
