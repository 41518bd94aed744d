//! Single-record access

use std::fmt::Debug;
use std::marker::PhantomData;
use std::sync::Arc;

use metrics::counter;
use tracing::debug;

use crate::domain::storage::KeyValueStore;
use crate::domain::DomainError;

use super::kind::EntityKind;

/// Short-lived handle addressing one record of kind `K`.
///
/// Holds nothing but the store and the instance id; every call re-reads the
/// store.
pub struct Entity<K: EntityKind> {
    store: Arc<dyn KeyValueStore>,
    id: String,
    _kind: PhantomData<fn() -> K>,
}

impl<K: EntityKind> Clone for Entity<K> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            id: self.id.clone(),
            _kind: PhantomData,
        }
    }
}

impl<K: EntityKind> Debug for Entity<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Entity")
            .field("entity", &K::ENTITY_NAME)
            .field("id", &self.id)
            .finish()
    }
}

impl<K: EntityKind> Entity<K> {
    pub fn new(store: Arc<dyn KeyValueStore>, id: impl Into<String>) -> Self {
        Self {
            store,
            id: id.into(),
            _kind: PhantomData,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn storage_key(&self) -> String {
        K::storage_key(&self.id)
    }

    /// True iff a record has been written under this key
    pub async fn exists(&self) -> Result<bool, DomainError> {
        self.store.contains(&self.storage_key()).await
    }

    /// Reads the stored record without the initial-state fallback
    pub async fn load(&self) -> Result<Option<K::State>, DomainError> {
        let key = self.storage_key();

        match self.store.get(&key).await? {
            Some(value) => serde_json::from_value(value).map(Some).map_err(|e| {
                DomainError::serialization(format!("Failed to decode '{}': {}", key, e))
            }),
            None => Ok(None),
        }
    }

    /// Stored record, or the kind's initial state when nothing was written
    pub async fn get_state(&self) -> Result<K::State, DomainError> {
        Ok(self.load().await?.unwrap_or_else(K::initial_state))
    }

    /// Writes `state` under this key, replacing whatever was there
    pub async fn save(&self, state: &K::State) -> Result<(), DomainError> {
        let value = serde_json::to_value(state)?;
        self.store.put(&self.storage_key(), value).await
    }

    /// Read-modify-write: applies `transform` to the current state and persists it.
    ///
    /// Last writer wins; concurrent mutations of the same key may interleave
    /// between the read and the write.
    pub async fn mutate<F>(&self, transform: F) -> Result<K::State, DomainError>
    where
        F: FnOnce(K::State) -> K::State + Send,
    {
        let current = self.get_state().await?;
        let next = transform(current);
        self.save(&next).await?;

        debug!(entity = K::ENTITY_NAME, id = %self.id, "Mutated entity");
        record_operation::<K>("mutate");

        Ok(next)
    }

    /// Removes the record only, returns whether one existed
    pub(crate) async fn remove(&self) -> Result<bool, DomainError> {
        self.store.delete(&self.storage_key()).await
    }

    /// Writes `state` under the key derived from it
    pub async fn create(
        store: &Arc<dyn KeyValueStore>,
        state: K::State,
    ) -> Result<K::State, DomainError> {
        let id = K::key_of(&state)?;
        Self::new(Arc::clone(store), id).save(&state).await?;
        record_operation::<K>("create");

        Ok(state)
    }

    /// Removes the record `id`, returns false when there was nothing to remove
    pub async fn delete(store: &Arc<dyn KeyValueStore>, id: &str) -> Result<bool, DomainError> {
        let removed = Self::new(Arc::clone(store), id).remove().await?;
        record_operation::<K>("delete");

        Ok(removed)
    }
}

pub(super) fn record_operation<K: EntityKind>(operation: &'static str) {
    counter!(
        "storefront_entity_operations_total",
        "entity" => K::ENTITY_NAME,
        "operation" => operation
    )
    .increment(1);
}
