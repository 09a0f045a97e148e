//! Secure key-value collaborator contract.
//!
//! # Responsibility
//! - Describe the minimal string store the item store persists through.
//! - Define the error type shared by every store implementation.
//!
//! # Invariants
//! - `set` fully replaces the previous value of a key.
//! - `delete` of an absent key succeeds.

use crate::db::DbError;
use async_trait::async_trait;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

/// Error raised by key-value stores and the item store codec.
#[derive(Debug)]
pub enum StoreError {
    Db(DbError),
    Serialization(serde_json::Error),
    /// Failure reported by an external store implementation.
    Backend(String),
    /// A blocking storage task panicked or was cancelled.
    TaskJoin(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Serialization(err) => write!(f, "item codec failed: {err}"),
            Self::Backend(message) => write!(f, "store backend failed: {message}"),
            Self::TaskJoin(message) => write!(f, "storage task failed: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Serialization(err) => Some(err),
            Self::Backend(_) | Self::TaskJoin(_) => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization(value)
    }
}

/// Device-local secure string store.
#[async_trait]
pub trait SecureKeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> StoreResult<Option<String>>;
    async fn set(&self, key: &str, value: &str) -> StoreResult<()>;
    async fn delete(&self, key: &str) -> StoreResult<()>;
}
