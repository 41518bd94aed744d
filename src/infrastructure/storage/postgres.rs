//! PostgreSQL key-value store implementation with connection pooling

use std::fmt::Debug;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::Row;

use crate::domain::storage::{KeyValueStore, StoredEntry};
use crate::domain::DomainError;

/// PostgreSQL storage configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PostgresConfig {
    /// Database connection URL
    pub url: String,
    /// Table holding every key
    pub table_name: String,
    /// Maximum number of connections in the pool
    pub max_connections: u32,
    /// Minimum number of connections to maintain
    pub min_connections: u32,
    /// Connection timeout in seconds
    pub connect_timeout_secs: u64,
    /// Idle timeout in seconds
    pub idle_timeout_secs: u64,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            url: "postgres://localhost/storefront".to_string(),
            table_name: "kv_store".to_string(),
            max_connections: 10,
            min_connections: 1,
            connect_timeout_secs: 30,
            idle_timeout_secs: 600,
        }
    }
}

impl PostgresConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn with_table_name(mut self, table_name: impl Into<String>) -> Self {
        self.table_name = table_name.into();
        self
    }

    pub fn with_max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    pub fn with_min_connections(mut self, min: u32) -> Self {
        self.min_connections = min;
        self
    }
}

/// PostgreSQL key-value store
///
/// Stores every key in a single `(key, data)` table. Prefix scans are key
/// ranges served by the primary key index; `COLLATE "C"` makes its order
/// match code point order.
pub struct PostgresKeyValueStore {
    pool: PgPool,
    table_name: String,
}

impl Debug for PostgresKeyValueStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostgresKeyValueStore")
            .field("table_name", &self.table_name)
            .finish()
    }
}

impl PostgresKeyValueStore {
    /// Creates a store over an existing pool
    pub fn new(pool: PgPool, table_name: impl Into<String>) -> Self {
        Self {
            pool,
            table_name: table_name.into(),
        }
    }

    /// Connects with connection pooling
    pub async fn connect(config: &PostgresConfig) -> Result<Self, DomainError> {
        validate_table_name(&config.table_name)?;

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(std::time::Duration::from_secs(config.connect_timeout_secs))
            .idle_timeout(std::time::Duration::from_secs(config.idle_timeout_secs))
            .connect(&config.url)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to connect to PostgreSQL: {}", e)))?;

        Ok(Self::new(pool, config.table_name.clone()))
    }

    /// Ensures the storage table exists
    pub async fn ensure_table(&self) -> Result<(), DomainError> {
        let query = format!(
            r#"
            CREATE TABLE IF NOT EXISTS {} (
                key TEXT COLLATE "C" PRIMARY KEY,
                data JSONB NOT NULL,
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
            self.table_name
        );

        sqlx::query(&query)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to create table: {}", e)))?;

        Ok(())
    }
}

fn validate_table_name(name: &str) -> Result<(), DomainError> {
    let valid = !name.is_empty()
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
        && !name.starts_with(|c: char| c.is_ascii_digit());

    if valid {
        Ok(())
    } else {
        Err(DomainError::configuration(format!(
            "Invalid table name '{}'",
            name
        )))
    }
}

#[async_trait]
impl KeyValueStore for PostgresKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, DomainError> {
        let query = format!("SELECT data FROM {} WHERE key = $1", self.table_name);

        let row = sqlx::query(&query)
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to get key '{}': {}", key, e)))?;

        Ok(row.map(|r| r.get::<Value, _>("data")))
    }

    async fn put(&self, key: &str, value: Value) -> Result<(), DomainError> {
        let query = format!(
            r#"
            INSERT INTO {} (key, data)
            VALUES ($1, $2)
            ON CONFLICT (key) DO UPDATE SET data = EXCLUDED.data, updated_at = NOW()
            "#,
            self.table_name
        );

        sqlx::query(&query)
            .bind(key)
            .bind(&value)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to put key '{}': {}", key, e)))?;

        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool, DomainError> {
        let query = format!("DELETE FROM {} WHERE key = $1", self.table_name);

        let result = sqlx::query(&query)
            .bind(key)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to delete key '{}': {}", key, e)))?;

        Ok(result.rows_affected() > 0)
    }

    async fn scan(
        &self,
        prefix: &str,
        start_after: Option<&str>,
        limit: Option<usize>,
    ) -> Result<Vec<StoredEntry>, DomainError> {
        let query = format!(
            r#"
            SELECT key, data FROM {}
            WHERE key >= $1
              AND ($2::TEXT IS NULL OR key < $2)
              AND ($3::TEXT IS NULL OR key > $3)
            ORDER BY key
            LIMIT $4
            "#,
            self.table_name
        );

        let limit = limit.map(|l| l.min(i64::MAX as usize) as i64);

        let rows = sqlx::query(&query)
            .bind(prefix)
            .bind(prefix_upper_bound(prefix))
            .bind(start_after)
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to scan '{}': {}", prefix, e)))?;

        Ok(rows
            .into_iter()
            .map(|row| StoredEntry::new(row.get::<String, _>("key"), row.get::<Value, _>("data")))
            .collect())
    }

    async fn ping(&self) -> Result<(), DomainError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("PostgreSQL ping failed: {}", e)))?;

        Ok(())
    }
}

/// Smallest string ordered after every string starting with `prefix`, so a
/// prefix scan becomes the primary-key range `[prefix, bound)`.
///
/// `None` means the range is unbounded above.
fn prefix_upper_bound(prefix: &str) -> Option<String> {
    let mut chars: Vec<char> = prefix.chars().collect();

    while let Some(last) = chars.pop() {
        if let Some(next) = next_char(last) {
            chars.push(next);
            return Some(chars.into_iter().collect());
        }
    }

    None
}

fn next_char(c: char) -> Option<char> {
    match c {
        char::MAX => None,
        '\u{D7FF}' => Some('\u{E000}'),
        c => char::from_u32(c as u32 + 1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_postgres_config_builder() {
        let config = PostgresConfig::new("postgres://db/shop")
            .with_table_name("shop_kv")
            .with_max_connections(4)
            .with_min_connections(2);

        assert_eq!(config.url, "postgres://db/shop");
        assert_eq!(config.table_name, "shop_kv");
        assert_eq!(config.max_connections, 4);
        assert_eq!(config.min_connections, 2);
        assert_eq!(config.connect_timeout_secs, 30);
    }

    #[test]
    fn test_prefix_upper_bound() {
        assert_eq!(prefix_upper_bound("idx:products:pos:").as_deref(), Some("idx:products:pos;"));
        assert_eq!(prefix_upper_bound("product:").as_deref(), Some("product;"));
        assert_eq!(prefix_upper_bound(""), None);
    }

    #[test]
    fn test_prefix_upper_bound_carries_past_max_char() {
        let prefix = format!("ab{}", char::MAX);

        assert_eq!(prefix_upper_bound(&prefix).as_deref(), Some("ac"));
        assert_eq!(prefix_upper_bound(&char::MAX.to_string()), None);
        assert_eq!(prefix_upper_bound("a\u{D7FF}").as_deref(), Some("a\u{E000}"));
    }

    #[test]
    fn test_prefix_upper_bound_excludes_only_non_matching_keys() {
        let prefix = "user:";
        let bound = prefix_upper_bound(prefix).unwrap();

        for key in ["user:", "user:alice", "user:~~~", "user:\u{10FFFF}"] {
            assert!(key >= prefix && key < bound.as_str(), "{}", key);
        }
        for key in ["user", "user;", "users:bob", "uses"] {
            assert!(!(key >= prefix && key < bound.as_str()), "{}", key);
        }
    }

    #[test]
    fn test_validate_table_name() {
        assert!(validate_table_name("kv_store").is_ok());
        assert!(validate_table_name("").is_err());
        assert!(validate_table_name("1table").is_err());
        assert!(validate_table_name("kv; DROP TABLE users").is_err());
    }
}
