//! SQLite-backed secure key-value store.
//!
//! # Responsibility
//! - Persist string values in the `secure_kv` table.
//! - Keep blocking SQLite calls off the async executor threads.
//!
//! # Invariants
//! - Each write is a single statement, so a value is replaced atomically.

use crate::db::{open_db, open_db_in_memory};
use crate::repo::kv_store::{SecureKeyValueStore, StoreError, StoreResult};
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tokio::task;

#[derive(Clone)]
pub struct SqliteKeyValueStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteKeyValueStore {
    /// Wraps a connection that already has migrations applied.
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    /// Opens (or creates) the store file at `path`.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        Ok(Self::new(open_db(path)?))
    }

    pub fn open_in_memory() -> StoreResult<Self> {
        Ok(Self::new(open_db_in_memory()?))
    }

    async fn run<T, F>(&self, op: F) -> StoreResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> rusqlite::Result<T> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        task::spawn_blocking(move || {
            let guard = conn
                .lock()
                .map_err(|_| StoreError::Backend("sqlite connection lock poisoned".to_string()))?;
            op(&guard).map_err(StoreError::from)
        })
        .await
        .map_err(|err| StoreError::TaskJoin(err.to_string()))?
    }
}

#[async_trait]
impl SecureKeyValueStore for SqliteKeyValueStore {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let key = key.to_string();
        self.run(move |conn| {
            conn.query_row(
                "SELECT value FROM secure_kv WHERE key = ?1;",
                [key.as_str()],
                |row| row.get(0),
            )
            .optional()
        })
        .await
    }

    async fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        let key = key.to_string();
        let value = value.to_string();
        self.run(move |conn| {
            conn.execute(
                "INSERT INTO secure_kv (key, value) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET
                    value = excluded.value,
                    updated_at = (strftime('%s', 'now') * 1000);",
                params![key, value],
            )
            .map(|_| ())
        })
        .await
    }

    async fn delete(&self, key: &str) -> StoreResult<()> {
        let key = key.to_string();
        self.run(move |conn| {
            conn.execute("DELETE FROM secure_kv WHERE key = ?1;", [key.as_str()])
                .map(|_| ())
        })
        .await
    }
}
