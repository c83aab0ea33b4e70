use crate::error::{Error, Result};
use async_trait::async_trait;
use chrono::Utc;
use log::debug;
use sqlx::{migrate::MigrateDatabase, sqlite::{SqlitePool, SqlitePoolOptions}, Row, Sqlite};
use std::collections::HashMap;
use tokio::sync::Mutex;

/// Key-value persistence for small string lists such as recent searches.
///
/// A key is a single shared resource: concurrent writers overwrite each
/// other and the last `set` wins.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Vec<String>>>;
    async fn set(&self, key: &str, values: &[String]) -> Result<()>;
}

#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, Vec<String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<String>>> {
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, values: &[String]) -> Result<()> {
        self.entries.lock().await.insert(key.to_string(), values.to_vec());
        Ok(())
    }
}

pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub async fn connect(db_url: &str) -> Result<Self> {
        // Create database if it doesn't exist
        if !Sqlite::database_exists(db_url).await.unwrap_or(false) {
            Sqlite::create_database(db_url).await?;
        }

        // Every in-memory connection is its own database, so keep exactly one
        let max_connections = if db_url.contains(":memory:") { 1 } else { 5 };
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect(db_url)
            .await?;

        Self::init_schema(&pool).await?;

        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn init_schema(pool: &SqlitePool) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS key_values (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            "#,
        )
        .execute(pool)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for SqliteStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<String>>> {
        let row = sqlx::query(
            r#"
            SELECT value
            FROM key_values
            WHERE key = ?
            "#,
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => {
                let raw = row.get::<String, _>("value");
                let values = serde_json::from_str(&raw)
                    .map_err(|e| Error::Storage(format!("Failed to decode value for {}: {}", key, e)))?;
                Ok(Some(values))
            }
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, values: &[String]) -> Result<()> {
        let raw = serde_json::to_string(values)
            .map_err(|e| Error::Storage(format!("Failed to encode value for {}: {}", key, e)))?;

        sqlx::query(
            r#"
            INSERT INTO key_values (key, value, updated_at)
            VALUES (?, ?, ?)
            ON CONFLICT(key)
            DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(raw)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;

        debug!("Stored {} value(s) under {}", values.len(), key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn memory_store_round_trips_and_overwrites() {
        let store = MemoryStore::new();
        assert_eq!(store.get("RecentSearch").await.unwrap(), None);

        store.set("RecentSearch", &strings(&["a", "b"])).await.unwrap();
        store.set("RecentSearch", &strings(&["c"])).await.unwrap();
        assert_eq!(store.get("RecentSearch").await.unwrap(), Some(strings(&["c"])));
    }

    #[tokio::test]
    async fn sqlite_store_persists_lists() {
        let store = SqliteStore::connect("sqlite::memory:").await.unwrap();
        assert_eq!(store.get("RecentSearch").await.unwrap(), None);

        store.set("RecentSearch", &strings(&["shoes", "bag"])).await.unwrap();
        assert_eq!(
            store.get("RecentSearch").await.unwrap(),
            Some(strings(&["shoes", "bag"]))
        );

        store.set("RecentSearch", &[]).await.unwrap();
        assert_eq!(store.get("RecentSearch").await.unwrap(), Some(Vec::new()));
    }

    #[tokio::test]
    async fn sqlite_store_rejects_corrupt_values() {
        let store = SqliteStore::connect("sqlite::memory:").await.unwrap();
        sqlx::query("INSERT INTO key_values (key, value, updated_at) VALUES ('RecentSearch', 'not json', '')")
            .execute(store.pool())
            .await
            .unwrap();

        let err = store.get("RecentSearch").await.unwrap_err();
        assert!(matches!(err, Error::Storage(_)));
    }
}
