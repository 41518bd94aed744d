//! Storage factory for runtime store selection

use std::str::FromStr;
use std::sync::Arc;

use tracing::info;

use crate::config::StorageSettings;
use crate::domain::storage::KeyValueStore;
use crate::domain::DomainError;

use super::in_memory::InMemoryKeyValueStore;
use super::postgres::{PostgresConfig, PostgresKeyValueStore};

/// Supported storage types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageType {
    /// In-memory storage (for testing/development)
    InMemory,
    /// PostgreSQL storage
    Postgres,
}

impl FromStr for StorageType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "memory" | "inmemory" | "in-memory" | "in_memory" => Ok(Self::InMemory),
            "postgres" | "postgresql" | "pg" => Ok(Self::Postgres),
            other => Err(DomainError::configuration(format!(
                "Unknown storage type '{}'",
                other
            ))),
        }
    }
}

/// Storage configuration
#[derive(Debug, Clone)]
pub enum StorageConfig {
    /// In-memory storage configuration
    InMemory,
    /// PostgreSQL storage configuration
    Postgres(PostgresConfig),
}

impl StorageConfig {
    /// Creates an in-memory storage configuration
    pub fn in_memory() -> Self {
        Self::InMemory
    }

    /// Creates a PostgreSQL configuration from a URL
    pub fn postgres_url(url: impl Into<String>) -> Self {
        Self::Postgres(PostgresConfig::new(url))
    }

    /// Builds the configuration from the application settings
    pub fn from_settings(settings: &StorageSettings) -> Result<Self, DomainError> {
        match settings.storage_type.parse::<StorageType>()? {
            StorageType::InMemory => Ok(Self::InMemory),
            StorageType::Postgres => Ok(Self::Postgres(settings.postgres.clone())),
        }
    }

    /// Returns the storage type
    pub fn storage_type(&self) -> StorageType {
        match self {
            Self::InMemory => StorageType::InMemory,
            Self::Postgres(_) => StorageType::Postgres,
        }
    }
}

/// Factory for creating store instances
#[derive(Debug)]
pub struct StorageFactory;

impl StorageFactory {
    /// Creates a store based on the configuration
    pub async fn create(config: &StorageConfig) -> Result<Arc<dyn KeyValueStore>, DomainError> {
        match config {
            StorageConfig::InMemory => {
                info!("Using in-memory key-value store");
                Ok(Arc::new(InMemoryKeyValueStore::new()))
            }
            StorageConfig::Postgres(pg_config) => {
                info!(table = %pg_config.table_name, "Using PostgreSQL key-value store");
                let store = PostgresKeyValueStore::connect(pg_config).await?;
                store.ensure_table().await?;
                Ok(Arc::new(store))
            }
        }
    }

    /// Creates an in-memory store
    pub fn create_in_memory() -> Arc<InMemoryKeyValueStore> {
        Arc::new(InMemoryKeyValueStore::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_type_from_str() {
        assert_eq!("memory".parse::<StorageType>().unwrap(), StorageType::InMemory);
        assert_eq!("in-memory".parse::<StorageType>().unwrap(), StorageType::InMemory);
        assert_eq!("postgres".parse::<StorageType>().unwrap(), StorageType::Postgres);
        assert_eq!("PG".parse::<StorageType>().unwrap(), StorageType::Postgres);
        assert!("unknown".parse::<StorageType>().is_err());
    }

    #[test]
    fn test_storage_config_types() {
        assert_eq!(StorageConfig::in_memory().storage_type(), StorageType::InMemory);

        let postgres = StorageConfig::postgres_url("postgres://localhost/test");
        assert_eq!(postgres.storage_type(), StorageType::Postgres);
    }

    #[test]
    fn test_storage_config_from_settings() {
        let settings = StorageSettings {
            storage_type: "postgres".to_string(),
            postgres: PostgresConfig::new("postgres://db/shop"),
        };

        match StorageConfig::from_settings(&settings).unwrap() {
            StorageConfig::Postgres(pg) => assert_eq!(pg.url, "postgres://db/shop"),
            other => panic!("unexpected config: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_factory_creates_in_memory() {
        let store = StorageFactory::create(&StorageConfig::in_memory()).await.unwrap();

        store.put("k", serde_json::json!(1)).await.unwrap();
        assert!(store.contains("k").await.unwrap());
    }
}
