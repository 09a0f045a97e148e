//! To-do list use-case service.
//!
//! # Responsibility
//! - Orchestrate the mutation gate, the in-memory collection and the
//!   background writer.
//! - Own item creation details: id generation, timestamp, open status.
//!
//! # Invariants
//! - The in-memory collection is authoritative for the running process;
//!   a failed write never rolls back a mutation.
//! - Mutations are refused until the initial load has completed.
//! - The collection lock is never held across a device prompt.

use crate::config::TodoConfig;
use crate::model::collection::ItemCollection;
use crate::model::item::{ItemPatch, TodoId, TodoItem, TodoValidationError};
use crate::repo::item_store::ItemStore;
use crate::service::gate::{GateError, MutationGate};
use crate::service::persist::PersistQueue;
use crate::session::state::SessionState;
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Error surfaced to UI callers of list mutations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TodoServiceError {
    /// Input rejected before any side effect.
    Validation(TodoValidationError),
    /// The user declined or failed the authentication prompt.
    NotAuthenticated,
    /// The initial load has not completed yet.
    NotLoaded,
}

impl Display for TodoServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotAuthenticated => write!(f, "not authenticated"),
            Self::NotLoaded => write!(f, "items are still loading"),
        }
    }
}

impl Error for TodoServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            _ => None,
        }
    }
}

impl From<GateError> for TodoServiceError {
    fn from(value: GateError) -> Self {
        match value {
            GateError::Validation(err) => Self::Validation(err),
            GateError::NotAuthenticated => Self::NotAuthenticated,
        }
    }
}

impl From<TodoValidationError> for TodoServiceError {
    fn from(value: TodoValidationError) -> Self {
        Self::Validation(value)
    }
}

pub type ServiceResult<T> = Result<T, TodoServiceError>;

pub struct TodoListService {
    collection: Mutex<ItemCollection>,
    store: ItemStore,
    gate: MutationGate,
    persist: PersistQueue,
}

impl TodoListService {
    /// Builds the service and starts its background writer.
    ///
    /// Must be called inside a tokio runtime.
    pub fn new(store: ItemStore, session: Arc<SessionState>, config: &TodoConfig) -> Self {
        let gate = MutationGate::new(session, config.prompts.clone(), config.delete_policy);
        Self {
            collection: Mutex::new(ItemCollection::new()),
            persist: PersistQueue::start(store.clone()),
            store,
            gate,
        }
    }

    pub fn session(&self) -> &Arc<SessionState> {
        self.gate.session()
    }

    /// Loads persisted items once. Later calls return the current items.
    pub async fn load(&self) -> Vec<TodoItem> {
        {
            let collection = self.collection.lock().await;
            if collection.is_loaded() {
                return collection.snapshot();
            }
        }

        let items = self.store.load().await;
        let mut collection = self.collection.lock().await;
        if !collection.is_loaded() {
            collection.finish_load(items);
            info!(
                "event=items_ready module=service status=ok count={}",
                collection.len()
            );
        }
        collection.snapshot()
    }

    pub async fn is_loaded(&self) -> bool {
        self.collection.lock().await.is_loaded()
    }

    /// Current items, newest first.
    pub async fn items(&self) -> Vec<TodoItem> {
        self.collection.lock().await.snapshot()
    }

    pub async fn get_item(&self, id: &TodoId) -> Option<TodoItem> {
        self.collection.lock().await.get(id).cloned()
    }

    /// Adds an open item at the head of the list.
    pub async fn add_item(&self, title: &str) -> ServiceResult<TodoItem> {
        self.ensure_loaded().await?;
        let title = self.gate.authorize_add(title).await?;
        let item = TodoItem::new(&title)?;

        let mut collection = self.collection.lock().await;
        let mut pending = item;
        while let Some(mut clash) = collection.insert_front(pending) {
            clash.id = TodoId::generate();
            pending = clash;
        }
        let created = collection.items()[0].clone();
        self.persist.schedule_save(collection.snapshot());
        info!(
            "event=item_add module=service status=ok item_id={} count={}",
            created.id,
            collection.len()
        );
        Ok(created)
    }

    /// Applies a partial update.
    ///
    /// Returns `Ok(None)` when `id` is unknown. An empty patch changes
    /// nothing and needs no authentication.
    pub async fn update_item(
        &self,
        id: &TodoId,
        patch: &ItemPatch,
    ) -> ServiceResult<Option<TodoItem>> {
        self.ensure_loaded().await?;
        if patch.is_empty() {
            return Ok(self.get_item(id).await);
        }
        let patch = self.gate.authorize_update(patch).await?;

        let mut collection = self.collection.lock().await;
        let updated = collection.update(id, &patch);
        if updated.is_some() {
            self.persist.schedule_save(collection.snapshot());
        }
        info!(
            "event=item_update module=service status={} item_id={id}",
            if updated.is_some() { "ok" } else { "not_found" }
        );
        Ok(updated)
    }

    /// Removes the item with `id`. Returns whether something was removed.
    pub async fn delete_item(&self, id: &TodoId) -> ServiceResult<bool> {
        self.ensure_loaded().await?;
        self.gate.authorize_delete().await?;

        let mut collection = self.collection.lock().await;
        let removed = collection.remove(id).is_some();
        if removed {
            self.persist.schedule_save(collection.snapshot());
        }
        info!(
            "event=item_delete module=service status={} item_id={id} count={}",
            if removed { "ok" } else { "not_found" },
            collection.len()
        );
        Ok(removed)
    }

    /// Removes every item and the persisted copy. Returns how many were removed.
    pub async fn clear_all(&self) -> ServiceResult<usize> {
        self.ensure_loaded().await?;
        self.gate.authorize_clear().await?;

        let mut collection = self.collection.lock().await;
        let removed = collection.len();
        collection.clear();
        self.persist.schedule_clear();
        info!("event=items_clear module=service status=ok removed={removed}");
        Ok(removed)
    }

    /// Waits for scheduled writes to reach the store.
    pub async fn flush(&self) {
        self.persist.flush().await;
    }

    async fn ensure_loaded(&self) -> ServiceResult<()> {
        if self.collection.lock().await.is_loaded() {
            Ok(())
        } else {
            Err(TodoServiceError::NotLoaded)
        }
    }
}
