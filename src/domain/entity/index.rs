//! Ordered, cursor-paginated key index
//!
//! An index named `n` is stored as two families of records:
//!
//! - `idx:n:pos:<position>` → entity key, one per member, where positions sort
//!   in insertion order;
//! - `idx:n:key:<entity key>` → position, used for membership checks and removal.
//!
//! Listing scans the position family, so pages come out in insertion order and
//! a cursor is simply the last position handed out.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::domain::storage::{KeyValueStore, StoredEntry};
use crate::domain::DomainError;

/// One page of a listing
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Resumption point for the next page, `None` once the end is reached
    pub next_cursor: Option<String>,
}

impl<T> Page<T> {
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            next_cursor: None,
        }
    }
}

/// A page of entity keys
pub type IndexPage = Page<String>;

static LAST_POSITION_TICK: AtomicU64 = AtomicU64::new(0);

/// Allocates a position greater than every position this process handed out
/// before. The random suffix keeps positions from different processes apart.
fn next_position() -> String {
    let now = Utc::now().timestamp_micros().max(0) as u64;
    let previous = LAST_POSITION_TICK
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
            Some(now.max(last + 1))
        })
        .unwrap_or_else(|last| last);
    let tick = now.max(previous + 1);

    format!("{:020}{:08x}", tick, rand::random::<u32>())
}

/// Handle on the index of one entity type
#[derive(Debug, Clone)]
pub struct Index {
    store: Arc<dyn KeyValueStore>,
    name: String,
}

impl Index {
    pub fn new(store: Arc<dyn KeyValueStore>, name: impl Into<String>) -> Self {
        Self {
            store,
            name: name.into(),
        }
    }

    fn position_prefix(&self) -> String {
        format!("idx:{}:pos:", self.name)
    }

    fn position_key(&self, position: &str) -> String {
        format!("{}{}", self.position_prefix(), position)
    }

    fn member_key(&self, key: &str) -> String {
        format!("idx:{}:key:{}", self.name, key)
    }

    /// Checks if `key` is a member
    pub async fn contains(&self, key: &str) -> Result<bool, DomainError> {
        self.store.contains(&self.member_key(key)).await
    }

    /// Appends `key` unless it is already a member, returns true if appended.
    ///
    /// The position record is written before the membership record.
    pub async fn add(&self, key: &str) -> Result<bool, DomainError> {
        let member_key = self.member_key(key);

        if self.store.contains(&member_key).await? {
            debug!(index = %self.name, key = %key, "Key already indexed");
            return Ok(false);
        }

        let position = next_position();
        self.store
            .put(&self.position_key(&position), Value::String(key.to_string()))
            .await?;
        self.store.put(&member_key, Value::String(position)).await?;

        Ok(true)
    }

    /// Removes `key` if present, returns true if it was a member.
    ///
    /// The membership record goes first, so a failure part way leaves the key
    /// listed rather than silently unlisted.
    pub async fn remove(&self, key: &str) -> Result<bool, DomainError> {
        let member_key = self.member_key(key);

        let Some(position) = self.store.get(&member_key).await? else {
            return Ok(false);
        };

        self.store.delete(&member_key).await?;

        match position.as_str() {
            Some(position) => {
                self.store.delete(&self.position_key(position)).await?;
            }
            None => {
                warn!(index = %self.name, key = %key, "Membership record without a position");
            }
        }

        Ok(true)
    }

    /// Lists up to `limit` keys after `cursor`, in insertion order.
    ///
    /// A `limit` of zero returns an empty page carrying `cursor` unchanged.
    pub async fn list(&self, cursor: Option<&str>, limit: usize) -> Result<IndexPage, DomainError> {
        if limit == 0 {
            return Ok(Page {
                items: Vec::new(),
                next_cursor: cursor.map(str::to_string),
            });
        }

        let prefix = self.position_prefix();
        let start_after = cursor.map(|c| self.position_key(c));

        let mut entries = self
            .store
            .scan(&prefix, start_after.as_deref(), Some(limit.saturating_add(1)))
            .await?;

        let has_more = entries.len() > limit;
        entries.truncate(limit);

        let next_cursor = if has_more {
            entries
                .last()
                .and_then(|e| e.key.strip_prefix(&prefix))
                .map(str::to_string)
        } else {
            None
        };

        let items = entries
            .into_iter()
            .filter_map(|entry| self.member_of(entry))
            .collect();

        Ok(Page { items, next_cursor })
    }

    fn member_of(&self, entry: StoredEntry) -> Option<String> {
        match entry.value {
            Value::String(key) => Some(key),
            other => {
                warn!(index = %self.name, position = %entry.key, value = %other, "Skipping malformed index entry");
                None
            }
        }
    }

    /// Every key, in insertion order
    pub async fn keys(&self) -> Result<Vec<String>, DomainError> {
        let entries = self.store.scan(&self.position_prefix(), None, None).await?;

        Ok(entries
            .into_iter()
            .filter_map(|entry| self.member_of(entry))
            .collect())
    }

    pub async fn len(&self) -> Result<usize, DomainError> {
        Ok(self.store.scan(&self.position_prefix(), None, None).await?.len())
    }

    pub async fn is_empty(&self) -> Result<bool, DomainError> {
        Ok(self
            .store
            .scan(&self.position_prefix(), None, Some(1))
            .await?
            .is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::storage::mock::MockKeyValueStore;
    use crate::infrastructure::storage::InMemoryKeyValueStore;

    fn index() -> Index {
        Index::new(Arc::new(InMemoryKeyValueStore::new()), "things")
    }

    async fn index_with(keys: &[&str]) -> Index {
        let index = index();
        for key in keys {
            index.add(key).await.unwrap();
        }
        index
    }

    async fn collect_pages(index: &Index, limit: usize) -> Vec<String> {
        let mut all = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let page = index.list(cursor.as_deref(), limit).await.unwrap();
            assert!(page.items.len() <= limit);
            all.extend(page.items);

            match page.next_cursor {
                Some(next) => cursor = Some(next),
                None => break,
            }
        }

        all
    }

    #[test]
    fn test_positions_are_strictly_increasing() {
        let positions: Vec<String> = (0..500).map(|_| next_position()).collect();

        for pair in positions.windows(2) {
            assert!(pair[0] < pair[1], "{} !< {}", pair[0], pair[1]);
        }
    }

    #[tokio::test]
    async fn test_list_preserves_insertion_order() {
        let index = index_with(&["b", "c", "a"]).await;

        let page = index.list(None, 10).await.unwrap();

        assert_eq!(page.items, vec!["b", "c", "a"]);
        assert_eq!(page.next_cursor, None);
    }

    #[tokio::test]
    async fn test_add_is_deduplicated() {
        let index = index();

        assert!(index.add("a").await.unwrap());
        assert!(!index.add("a").await.unwrap());

        assert_eq!(index.keys().await.unwrap(), vec!["a"]);
    }

    #[tokio::test]
    async fn test_remove() {
        let index = index_with(&["a", "b", "c"]).await;

        assert!(index.remove("b").await.unwrap());
        assert!(!index.contains("b").await.unwrap());
        assert_eq!(index.keys().await.unwrap(), vec!["a", "c"]);
    }

    #[tokio::test]
    async fn test_remove_absent_is_noop() {
        let index = index_with(&["a"]).await;

        assert!(!index.remove("zzz").await.unwrap());
        assert_eq!(index.len().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_readd_after_remove_goes_to_the_end() {
        let index = index_with(&["a", "b"]).await;

        index.remove("a").await.unwrap();
        index.add("a").await.unwrap();

        assert_eq!(index.keys().await.unwrap(), vec!["b", "a"]);
    }

    #[tokio::test]
    async fn test_pagination_is_exhaustive_and_non_duplicating() {
        let keys: Vec<String> = (0..23).map(|i| format!("k{}", i)).collect();
        let refs: Vec<&str> = keys.iter().map(String::as_str).collect();
        let index = index_with(&refs).await;

        for limit in [1, 4, 5, 23, 100] {
            assert_eq!(collect_pages(&index, limit).await, keys, "limit {}", limit);
        }
    }

    #[tokio::test]
    async fn test_exact_fit_page_has_no_cursor() {
        let index = index_with(&["a", "b"]).await;

        let page = index.list(None, 2).await.unwrap();

        assert_eq!(page.items.len(), 2);
        assert_eq!(page.next_cursor, None);
    }

    #[tokio::test]
    async fn test_zero_limit_keeps_cursor() {
        let index = index_with(&["a", "b"]).await;

        let page = index.list(Some("some-cursor"), 0).await.unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.next_cursor.as_deref(), Some("some-cursor"));

        let page = index.list(None, 0).await.unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.next_cursor, None);
    }

    #[tokio::test]
    async fn test_empty_index() {
        let index = index();

        assert!(index.is_empty().await.unwrap());
        assert_eq!(index.list(None, 10).await.unwrap(), Page::empty());
    }

    #[tokio::test]
    async fn test_indexes_do_not_overlap() {
        let store: Arc<dyn KeyValueStore> = Arc::new(InMemoryKeyValueStore::new());
        let users = Index::new(Arc::clone(&store), "users");
        let user_things = Index::new(Arc::clone(&store), "users_archive");

        users.add("alice").await.unwrap();
        user_things.add("bob").await.unwrap();

        assert_eq!(users.keys().await.unwrap(), vec!["alice"]);
        assert_eq!(user_things.keys().await.unwrap(), vec!["bob"]);
    }

    #[tokio::test]
    async fn test_failed_membership_write_leaves_key_listed() {
        let store = Arc::new(MockKeyValueStore::new().with_failing_writes("idx:things:key:"));
        let index = Index::new(store, "things");

        assert!(index.add("a").await.is_err());

        assert_eq!(index.keys().await.unwrap(), vec!["a"]);
    }

    #[tokio::test]
    async fn test_malformed_entry_is_skipped() {
        let store = Arc::new(
            MockKeyValueStore::new().with_entry("idx:things:pos:0001", serde_json::json!(42)),
        );
        let index = Index::new(store, "things");
        index.add("a").await.unwrap();

        assert_eq!(index.keys().await.unwrap(), vec!["a"]);
    }
}
