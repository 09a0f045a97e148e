//! In-memory item collection.
//!
//! # Invariants
//! - Items are ordered newest first; new items go to the head.
//! - Ids are unique within the collection.
//! - "Not loaded yet" and "loaded but empty" are distinct states, and once
//!   loaded the collection never returns to "not loaded".

use crate::model::item::{ItemPatch, TodoId, TodoItem};
use log::warn;
use std::collections::HashSet;

#[derive(Debug, Clone, Default)]
pub struct ItemCollection {
    items: Vec<TodoItem>,
    loaded: bool,
}

impl ItemCollection {
    /// Creates an empty collection that has not been loaded yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a loaded collection from persisted items.
    pub fn loaded(items: Vec<TodoItem>) -> Self {
        let mut collection = Self::new();
        collection.finish_load(items);
        collection
    }

    /// Installs the initial snapshot and marks the collection loaded.
    ///
    /// Duplicate ids keep their first occurrence. Returns how many records
    /// were dropped.
    pub fn finish_load(&mut self, items: Vec<TodoItem>) -> usize {
        let total = items.len();
        let mut seen = HashSet::with_capacity(total);
        self.items = items
            .into_iter()
            .filter(|item| seen.insert(item.id.clone()))
            .collect();
        self.loaded = true;

        let dropped = total - self.items.len();
        if dropped > 0 {
            warn!("event=collection_load module=model status=deduplicated dropped={dropped}");
        }
        dropped
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn items(&self) -> &[TodoItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: &TodoId) -> Option<&TodoItem> {
        self.items.iter().find(|item| &item.id == id)
    }

    pub fn contains(&self, id: &TodoId) -> bool {
        self.get(id).is_some()
    }

    /// Inserts `item` at the head.
    ///
    /// Returns the item back without inserting when its id is already taken.
    pub fn insert_front(&mut self, item: TodoItem) -> Option<TodoItem> {
        if self.contains(&item.id) {
            return Some(item);
        }
        self.items.insert(0, item);
        None
    }

    /// Merges `patch` into the item with `id`, returning the updated item.
    pub fn update(&mut self, id: &TodoId, patch: &ItemPatch) -> Option<TodoItem> {
        let item = self.items.iter_mut().find(|item| &item.id == id)?;
        item.apply(patch);
        Some(item.clone())
    }

    /// Removes the item with `id`. Unknown ids are a no-op.
    pub fn remove(&mut self, id: &TodoId) -> Option<TodoItem> {
        let index = self.items.iter().position(|item| &item.id == id)?;
        Some(self.items.remove(index))
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Owned copy of the current items, for persistence.
    pub fn snapshot(&self) -> Vec<TodoItem> {
        self.items.clone()
    }
}
