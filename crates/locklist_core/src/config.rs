//! Runtime configuration for the to-do core.
//!
//! # Invariants
//! - `TodoConfig::default()` reproduces the shipped app behavior: fixed
//!   storage key, session-cached delete, no idle auto-lock.

use crate::repo::item_store::DEFAULT_STORAGE_KEY;
use std::time::Duration;

/// How deletes interact with the cached session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeletePolicy {
    /// Deletes reuse an unlocked session like add/update do.
    #[default]
    SessionCached,
    /// Every delete shows a fresh device prompt.
    AlwaysPrompt,
}

/// Messages shown in the native authentication prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptMessages {
    pub unlock: String,
    pub add: String,
    pub update: String,
    pub delete: String,
}

impl Default for PromptMessages {
    fn default() -> Self {
        Self {
            unlock: "Unlock to access your todos".to_string(),
            add: "Authenticate to add TODO".to_string(),
            update: "Authenticate to update TODO".to_string(),
            delete: "Authenticate to delete TODO".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoConfig {
    pub storage_key: String,
    pub prompts: PromptMessages,
    pub delete_policy: DeletePolicy,
    /// `None` keeps an unlocked session until the explicit lock action.
    pub idle_timeout: Option<Duration>,
}

impl Default for TodoConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            prompts: PromptMessages::default(),
            delete_policy: DeletePolicy::default(),
            idle_timeout: None,
        }
    }
}
