//! Storefront backend
//!
//! Products, users, and chat boards persisted as JSON records in a key-value
//! store, with an append-ordered index per collection for listing.

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use api::state::AppState;
use domain::DomainError;
use infrastructure::storage::{StorageConfig, StorageFactory};
use tracing::info;

/// Connects the configured store and builds every service over it
pub async fn create_app_state(config: &AppConfig) -> anyhow::Result<AppState> {
    if config.catalog.page_size == 0 {
        return Err(DomainError::configuration("catalog.page_size must be greater than zero").into());
    }

    let storage_config = StorageConfig::from_settings(&config.storage)?;
    info!(storage = ?storage_config.storage_type(), "Initializing storage");

    let store = StorageFactory::create(&storage_config).await?;

    Ok(AppState::new(store, config.catalog.page_size))
}
