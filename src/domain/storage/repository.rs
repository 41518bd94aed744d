//! Key-value store trait definition

use std::fmt::Debug;

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::DomainError;

/// A key and the value stored under it, as returned by [`KeyValueStore::scan`]
#[derive(Debug, Clone, PartialEq)]
pub struct StoredEntry {
    pub key: String,
    pub value: Value,
}

impl StoredEntry {
    pub fn new(key: impl Into<String>, value: Value) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }
}

/// Primitive durable storage keyed by string, holding JSON values.
///
/// Each method is atomic for the single key it touches. Nothing spanning
/// several keys is atomic, and callers must not assume otherwise.
#[async_trait]
pub trait KeyValueStore: Send + Sync + Debug {
    /// Returns the value stored under `key`, if any
    async fn get(&self, key: &str) -> Result<Option<Value>, DomainError>;

    /// Stores `value` under `key`, replacing any previous value
    async fn put(&self, key: &str, value: Value) -> Result<(), DomainError>;

    /// Removes `key`, returns true if a value was removed
    async fn delete(&self, key: &str) -> Result<bool, DomainError>;

    /// Enumerates entries whose key starts with `prefix`, in ascending key order.
    ///
    /// When `start_after` is set only keys strictly greater than it are
    /// returned. `limit` caps the number of entries.
    async fn scan(
        &self,
        prefix: &str,
        start_after: Option<&str>,
        limit: Option<usize>,
    ) -> Result<Vec<StoredEntry>, DomainError>;

    /// Checks if a value is stored under `key`
    async fn contains(&self, key: &str) -> Result<bool, DomainError> {
        Ok(self.get(key).await?.is_some())
    }

    /// Verifies the store is reachable
    async fn ping(&self) -> Result<(), DomainError> {
        self.scan("", None, Some(1)).await.map(|_| ())
    }
}
