//! Seed command - fills empty collections with fixtures

use std::sync::Arc;

use tracing::info;

use crate::config::AppConfig;
use crate::domain::storage::KeyValueStore;
use crate::domain::{ChatBoardKind, DomainError, IndexedEntity, ProductKind, UserKind};
use crate::infrastructure::logging;
use crate::infrastructure::storage::{StorageConfig, StorageFactory};

/// Records inserted per collection; zero where data already existed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub users: usize,
    pub products: usize,
    pub chats: usize,
}

pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().unwrap_or_default();
    logging::init_logging(&config.logging);

    let store = StorageFactory::create(&StorageConfig::from_settings(&config.storage)?).await?;
    let report = seed_all(&store).await?;

    info!(
        users = report.users,
        products = report.products,
        chats = report.chats,
        "Seeding complete"
    );

    Ok(())
}

pub async fn seed_all(store: &Arc<dyn KeyValueStore>) -> Result<SeedReport, DomainError> {
    Ok(SeedReport {
        users: IndexedEntity::<UserKind>::ensure_seed(store).await?,
        products: IndexedEntity::<ProductKind>::ensure_seed(store).await?,
        chats: IndexedEntity::<ChatBoardKind>::ensure_seed(store).await?,
    })
}
