//! Persisted item collection over a secure key-value store.
//!
//! # Responsibility
//! - Encode/decode the whole collection as one JSON array under one key.
//! - Apply the failure policy: reads and clears never fail the caller,
//!   writes report failure so callers can log it.
//!
//! # Invariants
//! - `save` always writes the complete snapshot (full replace).
//! - A missing key loads as an empty collection.

use crate::model::item::TodoItem;
use crate::repo::kv_store::{SecureKeyValueStore, StoreResult};
use log::{debug, warn};
use std::sync::Arc;
use std::time::Instant;

/// Storage key used by every released build for the item collection.
pub const DEFAULT_STORAGE_KEY: &str = "secure_todos_v1";

#[derive(Clone)]
pub struct ItemStore {
    kv: Arc<dyn SecureKeyValueStore>,
    key: String,
}

impl ItemStore {
    pub fn new(kv: Arc<dyn SecureKeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            kv,
            key: key.into(),
        }
    }

    pub fn with_default_key(kv: Arc<dyn SecureKeyValueStore>) -> Self {
        Self::new(kv, DEFAULT_STORAGE_KEY)
    }

    pub fn key(&self) -> &str {
        self.key.as_str()
    }

    /// Reads persisted items.
    ///
    /// Read and decode failures are logged and yield an empty list.
    pub async fn load(&self) -> Vec<TodoItem> {
        let started_at = Instant::now();
        let raw = match self.kv.get(&self.key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!("event=items_load module=store status=empty reason=absent");
                return Vec::new();
            }
            Err(err) => {
                warn!(
                    "event=items_load module=store status=error error_code=read_failed error={err}"
                );
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<TodoItem>>(&raw) {
            Ok(items) => {
                debug!(
                    "event=items_load module=store status=ok count={} duration_ms={}",
                    items.len(),
                    started_at.elapsed().as_millis()
                );
                items
            }
            Err(err) => {
                warn!(
                    "event=items_load module=store status=error error_code=decode_failed error={err}"
                );
                Vec::new()
            }
        }
    }

    /// Writes the full snapshot.
    pub async fn save(&self, items: &[TodoItem]) -> StoreResult<()> {
        let raw = serde_json::to_string(items)?;
        self.kv.set(&self.key, &raw).await?;
        debug!("event=items_save module=store status=ok count={}", items.len());
        Ok(())
    }

    /// Removes all persisted items. Failures are logged only.
    pub async fn clear(&self) {
        match self.kv.delete(&self.key).await {
            Ok(()) => debug!("event=items_clear module=store status=ok"),
            Err(err) => warn!(
                "event=items_clear module=store status=error error_code=delete_failed error={err}"
            ),
        }
    }
}
