//! In-memory key-value store implementation

use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::RwLock;

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::storage::{KeyValueStore, StoredEntry};
use crate::domain::DomainError;

/// Thread-safe in-memory key-value store
///
/// Useful for testing and development. Data is lost when the process terminates.
#[derive(Debug, Default)]
pub struct InMemoryKeyValueStore {
    entries: RwLock<BTreeMap<String, Value>>,
}

impl InMemoryKeyValueStore {
    /// Creates a new empty in-memory store
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with entries
    pub fn with_entries(entries: impl IntoIterator<Item = (String, Value)>) -> Self {
        Self {
            entries: RwLock::new(entries.into_iter().collect()),
        }
    }

    /// Number of raw keys held, index records included
    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl KeyValueStore for InMemoryKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, DomainError> {
        let entries = self.entries.read().map_err(|e| {
            DomainError::storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(entries.get(key).cloned())
    }

    async fn put(&self, key: &str, value: Value) -> Result<(), DomainError> {
        let mut entries = self.entries.write().map_err(|e| {
            DomainError::storage(format!("Failed to acquire write lock: {}", e))
        })?;

        entries.insert(key.to_string(), value);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool, DomainError> {
        let mut entries = self.entries.write().map_err(|e| {
            DomainError::storage(format!("Failed to acquire write lock: {}", e))
        })?;

        Ok(entries.remove(key).is_some())
    }

    async fn scan(
        &self,
        prefix: &str,
        start_after: Option<&str>,
        limit: Option<usize>,
    ) -> Result<Vec<StoredEntry>, DomainError> {
        let entries = self.entries.read().map_err(|e| {
            DomainError::storage(format!("Failed to acquire read lock: {}", e))
        })?;

        let lower = match start_after {
            Some(after) if after >= prefix => Bound::Excluded(after.to_string()),
            _ => Bound::Included(prefix.to_string()),
        };

        Ok(entries
            .range((lower, Bound::Unbounded))
            .take_while(|(k, _)| k.starts_with(prefix))
            .take(limit.unwrap_or(usize::MAX))
            .map(|(k, v)| StoredEntry::new(k.clone(), v.clone()))
            .collect())
    }

    async fn contains(&self, key: &str) -> Result<bool, DomainError> {
        let entries = self.entries.read().map_err(|e| {
            DomainError::storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(entries.contains_key(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn seeded() -> InMemoryKeyValueStore {
        InMemoryKeyValueStore::with_entries([
            ("a:1".to_string(), json!(1)),
            ("a:2".to_string(), json!(2)),
            ("a:3".to_string(), json!(3)),
            ("b:1".to_string(), json!(10)),
        ])
    }

    #[tokio::test]
    async fn test_put_and_get() {
        let store = InMemoryKeyValueStore::new();

        store.put("k", json!({"v": 1})).await.unwrap();

        assert_eq!(store.get("k").await.unwrap(), Some(json!({"v": 1})));
        assert_eq!(store.get("missing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_put_overwrites() {
        let store = InMemoryKeyValueStore::new();

        store.put("k", json!(1)).await.unwrap();
        store.put("k", json!(2)).await.unwrap();

        assert_eq!(store.get("k").await.unwrap(), Some(json!(2)));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_delete() {
        let store = seeded();

        assert!(store.delete("a:1").await.unwrap());
        assert!(!store.delete("a:1").await.unwrap());
        assert!(!store.contains("a:1").await.unwrap());
    }

    #[tokio::test]
    async fn test_scan_prefix_only() {
        let store = seeded();

        let keys: Vec<String> = store
            .scan("a:", None, None)
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.key)
            .collect();

        assert_eq!(keys, vec!["a:1", "a:2", "a:3"]);
    }

    #[tokio::test]
    async fn test_scan_start_after_and_limit() {
        let store = seeded();

        let entries = store.scan("a:", Some("a:1"), Some(1)).await.unwrap();

        assert_eq!(entries, vec![StoredEntry::new("a:2", json!(2))]);
    }

    #[tokio::test]
    async fn test_scan_start_after_below_prefix_is_ignored() {
        let store = seeded();

        let entries = store.scan("b:", Some("a:9"), None).await.unwrap();

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].key, "b:1");
    }

    #[tokio::test]
    async fn test_scan_past_end_is_empty() {
        let store = seeded();

        let entries = store.scan("a:", Some("a:3"), None).await.unwrap();

        assert!(entries.is_empty());
    }

    #[tokio::test]
    async fn test_ping() {
        let store = InMemoryKeyValueStore::new();
        assert!(store.ping().await.is_ok());
        assert!(store.is_empty());
    }
}
