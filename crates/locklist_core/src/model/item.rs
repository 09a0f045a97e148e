//! To-do item record.
//!
//! # Invariants
//! - `id` and `created_at` never change after creation.
//! - `title` is non-empty after trimming.
//! - Wire fields are `id`, `title`, `completed`, `createdAt`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Opaque stable identifier of one to-do item.
///
/// Generated ids are UUID v4 strings, but persisted ids are accepted as-is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoId(String);

impl TodoId {
    /// Generates a fresh random id.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for TodoId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for TodoId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for TodoId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Input validation failures for item titles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TodoValidationError {
    EmptyTitle,
}

impl Display for TodoValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "title must not be empty"),
        }
    }
}

impl Error for TodoValidationError {}

/// Trims `raw` and rejects titles that are empty afterwards.
pub fn normalize_title(raw: &str) -> Result<String, TodoValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(TodoValidationError::EmptyTitle);
    }
    Ok(trimmed.to_string())
}

/// Canonical persisted to-do record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoItem {
    pub id: TodoId,
    pub title: String,
    pub completed: bool,
    /// Serialized as an RFC 3339 string.
    pub created_at: DateTime<Utc>,
}

impl TodoItem {
    /// Creates an open item with a generated id, stamped with the current time.
    ///
    /// # Errors
    /// - `EmptyTitle` when `title` is blank after trimming.
    pub fn new(title: &str) -> Result<Self, TodoValidationError> {
        Ok(Self {
            id: TodoId::generate(),
            title: normalize_title(title)?,
            completed: false,
            created_at: Utc::now(),
        })
    }

    /// Merges present patch fields into this item.
    ///
    /// Callers validate `patch` first; the title is stored as given.
    pub fn apply(&mut self, patch: &ItemPatch) {
        if let Some(title) = &patch.title {
            self.title = title.clone();
        }
        if let Some(completed) = patch.completed {
            self.completed = completed;
        }
    }
}

/// Partial update request. Absent fields keep their current values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemPatch {
    pub title: Option<String>,
    pub completed: Option<bool>,
}

impl ItemPatch {
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            completed: None,
        }
    }

    pub fn completed(completed: bool) -> Self {
        Self {
            title: None,
            completed: Some(completed),
        }
    }

    /// Returns a copy with a trimmed title, rejecting blank titles.
    pub fn normalized(&self) -> Result<Self, TodoValidationError> {
        let title = self.title.as_deref().map(normalize_title).transpose()?;
        Ok(Self {
            title,
            completed: self.completed,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.completed.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::{normalize_title, ItemPatch, TodoItem, TodoValidationError};

    #[test]
    fn new_item_trims_title_and_starts_open() {
        let item = TodoItem::new("  Buy milk \n").expect("valid title");
        assert_eq!(item.title, "Buy milk");
        assert!(!item.completed);
        assert!(!item.id.as_str().is_empty());
    }

    #[test]
    fn blank_titles_are_rejected() {
        assert_eq!(normalize_title(""), Err(TodoValidationError::EmptyTitle));
        assert_eq!(normalize_title(" \t "), Err(TodoValidationError::EmptyTitle));
        assert!(TodoItem::new("   ").is_err());
    }

    #[test]
    fn generated_ids_are_distinct() {
        let a = TodoItem::new("a").expect("a");
        let b = TodoItem::new("b").expect("b");
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn apply_only_touches_present_fields() {
        let mut item = TodoItem::new("Buy milk").expect("valid title");
        let created_at = item.created_at;

        item.apply(&ItemPatch::completed(true));
        assert_eq!(item.title, "Buy milk");
        assert!(item.completed);

        item.apply(&ItemPatch::title("Buy oat milk"));
        assert_eq!(item.title, "Buy oat milk");
        assert!(item.completed);
        assert_eq!(item.created_at, created_at);
    }

    #[test]
    fn patch_normalization_trims_and_rejects_blank_title() {
        let patch = ItemPatch {
            title: Some("  eggs ".to_string()),
            completed: Some(false),
        };
        let normalized = patch.normalized().expect("valid patch");
        assert_eq!(normalized.title.as_deref(), Some("eggs"));
        assert_eq!(normalized.completed, Some(false));

        let err = ItemPatch::title("  ").normalized().expect_err("blank title");
        assert_eq!(err, TodoValidationError::EmptyTitle);

        assert!(ItemPatch::completed(true)
            .normalized()
            .expect("no title to validate")
            .title
            .is_none());
    }
}
