//! Entities enumerable through an index

use std::fmt::Debug;
use std::ops::Deref;
use std::sync::Arc;

use metrics::counter;
use tracing::{debug, info};

use crate::domain::storage::KeyValueStore;
use crate::domain::DomainError;

use super::index::{Index, Page};
use super::kind::IndexedKind;
use super::record::{record_operation, Entity};

/// Handle on one record of an indexed kind.
///
/// Dereferences to [`Entity`] for the single-record operations. The associated
/// functions keep the kind's index in step with its records:
///
/// - `create` writes the record, then appends its key to the index;
/// - `delete` removes the key from the index, then removes the record.
///
/// The two writes are not atomic. A failure between them leaves a record that
/// is stored but not listed (create), or a listed key whose record still exists
/// (delete). Listing skips keys whose record has disappeared.
pub struct IndexedEntity<K: IndexedKind> {
    entity: Entity<K>,
}

impl<K: IndexedKind> Clone for IndexedEntity<K> {
    fn clone(&self) -> Self {
        Self {
            entity: self.entity.clone(),
        }
    }
}

impl<K: IndexedKind> Debug for IndexedEntity<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndexedEntity")
            .field("entity", &K::ENTITY_NAME)
            .field("index", &K::INDEX_NAME)
            .field("id", &self.entity.id())
            .finish()
    }
}

impl<K: IndexedKind> Deref for IndexedEntity<K> {
    type Target = Entity<K>;

    fn deref(&self) -> &Self::Target {
        &self.entity
    }
}

impl<K: IndexedKind> IndexedEntity<K> {
    pub fn new(store: Arc<dyn KeyValueStore>, id: impl Into<String>) -> Self {
        Self {
            entity: Entity::new(store, id),
        }
    }

    /// The index of this kind
    pub fn index(store: &Arc<dyn KeyValueStore>) -> Index {
        Index::new(Arc::clone(store), K::INDEX_NAME)
    }

    /// Writes `state` under its derived key and appends the key to the index
    pub async fn create(
        store: &Arc<dyn KeyValueStore>,
        state: K::State,
    ) -> Result<K::State, DomainError> {
        let id = K::key_of(&state)?;

        Entity::<K>::new(Arc::clone(store), id.as_str())
            .save(&state)
            .await?;
        Self::index(store).add(&id).await?;

        debug!(entity = K::ENTITY_NAME, id = %id, "Created entity");
        record_operation::<K>("create");

        Ok(state)
    }

    /// Removes `id` from the index and deletes its record.
    ///
    /// Returns whether a record existed; a missing record is not an error.
    pub async fn delete(store: &Arc<dyn KeyValueStore>, id: &str) -> Result<bool, DomainError> {
        Self::index(store).remove(id).await?;
        let removed = Entity::<K>::new(Arc::clone(store), id).remove().await?;

        debug!(entity = K::ENTITY_NAME, id = %id, removed, "Deleted entity");
        record_operation::<K>("delete");

        Ok(removed)
    }

    /// Inserts the fixture records when the index is empty.
    ///
    /// Returns how many records were seeded, zero when data already exists.
    /// Two callers racing on a cold store can both see it empty and both seed;
    /// records overwrite each other but the index may gain duplicate positions.
    pub async fn ensure_seed(store: &Arc<dyn KeyValueStore>) -> Result<usize, DomainError> {
        if !Self::index(store).is_empty().await? {
            return Ok(0);
        }

        let seeds = K::seed_data();
        let count = seeds.len();

        for state in seeds {
            Self::create(store, state).await?;
        }

        info!(entity = K::ENTITY_NAME, index = K::INDEX_NAME, count, "Seeded empty index");
        counter!("storefront_seeded_records_total", "entity" => K::ENTITY_NAME)
            .increment(count as u64);

        Ok(count)
    }

    /// Lists a page of records, resolving each indexed key to its record.
    ///
    /// Keys whose record is gone are skipped.
    pub async fn list(
        store: &Arc<dyn KeyValueStore>,
        cursor: Option<&str>,
        limit: usize,
    ) -> Result<Page<K::State>, DomainError> {
        let page = Self::index(store).list(cursor, limit).await?;
        let mut items = Vec::with_capacity(page.items.len());

        for id in page.items {
            match Entity::<K>::new(Arc::clone(store), id.as_str()).load().await? {
                Some(state) => items.push(state),
                None => {
                    debug!(entity = K::ENTITY_NAME, id = %id, "Skipping dangling index entry");
                }
            }
        }

        Ok(Page {
            items,
            next_cursor: page.next_cursor,
        })
    }

    /// Lists every record, following cursors `page_size` keys at a time
    pub async fn list_all(
        store: &Arc<dyn KeyValueStore>,
        page_size: usize,
    ) -> Result<Vec<K::State>, DomainError> {
        if page_size == 0 {
            return Err(DomainError::validation("Page size must be greater than zero"));
        }

        let mut all = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let page = Self::list(store, cursor.as_deref(), page_size).await?;
            all.extend(page.items);

            match page.next_cursor {
                Some(next) => cursor = Some(next),
                None => return Ok(all),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::{require_key_field, EntityKind};
    use crate::domain::storage::mock::MockKeyValueStore;
    use crate::infrastructure::storage::InMemoryKeyValueStore;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Item {
        id: String,
        label: String,
    }

    struct ItemKind;

    impl EntityKind for ItemKind {
        type State = Item;

        const ENTITY_NAME: &'static str = "item";

        fn initial_state() -> Item {
            Item {
                id: String::new(),
                label: String::new(),
            }
        }

        fn key_of(state: &Item) -> Result<String, DomainError> {
            require_key_field("item", "id", &state.id)
        }
    }

    impl IndexedKind for ItemKind {
        const INDEX_NAME: &'static str = "items";

        fn seed_data() -> Vec<Item> {
            vec![item("s1", "seed one"), item("s2", "seed two")]
        }
    }

    type Items = IndexedEntity<ItemKind>;

    fn item(id: &str, label: &str) -> Item {
        Item {
            id: id.to_string(),
            label: label.to_string(),
        }
    }

    fn store() -> Arc<dyn KeyValueStore> {
        Arc::new(InMemoryKeyValueStore::new())
    }

    async fn listed_ids(store: &Arc<dyn KeyValueStore>) -> Vec<String> {
        Items::list_all(store, 10)
            .await
            .unwrap()
            .into_iter()
            .map(|i| i.id)
            .collect()
    }

    #[tokio::test]
    async fn test_create_then_get_state() {
        let store = store();

        Items::create(&store, item("a", "A")).await.unwrap();

        let handle = Items::new(Arc::clone(&store), "a");
        assert!(handle.exists().await.unwrap());
        assert_eq!(handle.get_state().await.unwrap(), item("a", "A"));
    }

    #[tokio::test]
    async fn test_create_create_delete_leaves_only_second() {
        let store = store();

        Items::create(&store, item("a", "A")).await.unwrap();
        Items::create(&store, item("b", "B")).await.unwrap();
        assert!(Items::delete(&store, "a").await.unwrap());

        assert_eq!(listed_ids(&store).await, vec!["b"]);
        assert_eq!(Items::index(&store).keys().await.unwrap(), vec!["b"]);
    }

    #[tokio::test]
    async fn test_recreate_does_not_double_index() {
        let store = store();

        Items::create(&store, item("a", "first")).await.unwrap();
        Items::create(&store, item("a", "second")).await.unwrap();

        let all = Items::list_all(&store, 10).await.unwrap();
        assert_eq!(all, vec![item("a", "second")]);
    }

    #[tokio::test]
    async fn test_delete_missing_returns_false_and_keeps_index() {
        let store = store();
        Items::create(&store, item("a", "A")).await.unwrap();

        assert!(!Items::delete(&store, "ghost").await.unwrap());

        assert_eq!(listed_ids(&store).await, vec!["a"]);
    }

    #[tokio::test]
    async fn test_deleted_record_reads_as_initial_state() {
        let store = store();
        Items::create(&store, item("a", "A")).await.unwrap();

        Items::delete(&store, "a").await.unwrap();

        let handle = Items::new(Arc::clone(&store), "a");
        assert!(!handle.exists().await.unwrap());
        assert_eq!(handle.get_state().await.unwrap(), ItemKind::initial_state());
    }

    #[tokio::test]
    async fn test_list_skips_dangling_keys() {
        let store = store();
        Items::create(&store, item("a", "A")).await.unwrap();
        Items::create(&store, item("b", "B")).await.unwrap();

        // record vanishes behind the index's back
        Entity::<ItemKind>::delete(&store, "a").await.unwrap();

        let page = Items::list(&store, None, 10).await.unwrap();
        assert_eq!(page.items, vec![item("b", "B")]);
    }

    #[tokio::test]
    async fn test_list_pages_follow_cursor() {
        let store = store();
        for i in 0..5 {
            Items::create(&store, item(&format!("i{}", i), "x")).await.unwrap();
        }

        let first = Items::list(&store, None, 2).await.unwrap();
        assert_eq!(first.items.len(), 2);
        let cursor = first.next_cursor.expect("more pages");

        let second = Items::list(&store, Some(&cursor), 10).await.unwrap();
        assert_eq!(second.items.len(), 3);
        assert_eq!(second.next_cursor, None);
        assert_eq!(second.items[0].id, "i2");
    }

    #[tokio::test]
    async fn test_ensure_seed_is_idempotent() {
        let store = store();

        assert_eq!(Items::ensure_seed(&store).await.unwrap(), 2);
        assert_eq!(Items::ensure_seed(&store).await.unwrap(), 0);

        assert_eq!(listed_ids(&store).await, vec!["s1", "s2"]);
    }

    #[tokio::test]
    async fn test_ensure_seed_skips_when_data_exists() {
        let store = store();
        Items::create(&store, item("mine", "M")).await.unwrap();

        assert_eq!(Items::ensure_seed(&store).await.unwrap(), 0);
        assert_eq!(listed_ids(&store).await, vec!["mine"]);
    }

    #[tokio::test]
    async fn test_ensure_seed_runs_again_once_emptied() {
        let store = store();
        Items::ensure_seed(&store).await.unwrap();
        Items::delete(&store, "s1").await.unwrap();
        Items::delete(&store, "s2").await.unwrap();

        assert_eq!(Items::ensure_seed(&store).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_create_with_failed_index_write_leaves_unlisted_record() {
        let store: Arc<dyn KeyValueStore> =
            Arc::new(MockKeyValueStore::new().with_failing_writes("idx:"));

        let result = Items::create(&store, item("a", "A")).await;
        assert!(matches!(result, Err(DomainError::Storage { .. })));

        assert!(Items::new(Arc::clone(&store), "a").exists().await.unwrap());
        assert!(Items::index(&store).is_empty().await.unwrap());
    }

    #[tokio::test]
    async fn test_create_missing_key_is_validation_error() {
        let store = store();

        let result = Items::create(&store, item("", "no id")).await;

        assert!(matches!(result, Err(DomainError::Validation { .. })));
        assert!(Items::index(&store).is_empty().await.unwrap());
    }

    #[tokio::test]
    async fn test_list_all_rejects_zero_page_size() {
        assert!(Items::list_all(&store(), 0).await.is_err());
    }

    #[tokio::test]
    async fn test_mutate_through_handle() {
        let store = store();
        Items::create(&store, item("a", "A")).await.unwrap();

        let updated = Items::new(Arc::clone(&store), "a")
            .mutate(|mut i| {
                i.label = "renamed".to_string();
                i
            })
            .await
            .unwrap();

        assert_eq!(updated.label, "renamed");
        assert_eq!(listed_ids(&store).await, vec!["a"]);
    }
}
