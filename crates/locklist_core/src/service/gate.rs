//! Mutation gate: validation first, then the session precondition.
//!
//! # Invariants
//! - Blank titles are rejected before the session is consulted.
//! - A denied mutation performs no side effect.
//! - Every gated mutation funnels through the session; only
//!   `DeletePolicy::AlwaysPrompt` bypasses the cached unlock.

use crate::config::{DeletePolicy, PromptMessages};
use crate::model::item::{normalize_title, ItemPatch, TodoValidationError};
use crate::session::state::SessionState;
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

/// Kind of mutation requested by the list controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MutationKind {
    Add,
    Update,
    Delete,
    Clear,
}

impl MutationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Clear => "clear",
        }
    }
}

/// Reason a mutation was refused by the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateError {
    Validation(TodoValidationError),
    NotAuthenticated,
}

impl Display for GateError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotAuthenticated => write!(f, "not authenticated"),
        }
    }
}

impl Error for GateError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::NotAuthenticated => None,
        }
    }
}

impl From<TodoValidationError> for GateError {
    fn from(value: TodoValidationError) -> Self {
        Self::Validation(value)
    }
}

pub type GateResult<T> = Result<T, GateError>;

pub struct MutationGate {
    session: Arc<SessionState>,
    prompts: PromptMessages,
    delete_policy: DeletePolicy,
}

impl MutationGate {
    pub fn new(
        session: Arc<SessionState>,
        prompts: PromptMessages,
        delete_policy: DeletePolicy,
    ) -> Self {
        Self {
            session,
            prompts,
            delete_policy,
        }
    }

    pub fn session(&self) -> &Arc<SessionState> {
        &self.session
    }

    /// Validates a new title and authorizes the add.
    ///
    /// Returns the trimmed title.
    pub async fn authorize_add(&self, title: &str) -> GateResult<String> {
        let title = normalize_title(title)?;
        self.require_session(MutationKind::Add).await?;
        Ok(title)
    }

    /// Validates a partial update and authorizes it.
    ///
    /// Returns the patch with its title trimmed.
    pub async fn authorize_update(&self, patch: &ItemPatch) -> GateResult<ItemPatch> {
        let patch = patch.normalized()?;
        self.require_session(MutationKind::Update).await?;
        Ok(patch)
    }

    pub async fn authorize_delete(&self) -> GateResult<()> {
        self.require_session(MutationKind::Delete).await
    }

    pub async fn authorize_clear(&self) -> GateResult<()> {
        self.require_session(MutationKind::Clear).await
    }

    async fn require_session(&self, kind: MutationKind) -> GateResult<()> {
        let message = match kind {
            MutationKind::Add => self.prompts.add.as_str(),
            MutationKind::Update => self.prompts.update.as_str(),
            MutationKind::Delete | MutationKind::Clear => self.prompts.delete.as_str(),
        };
        let destructive = matches!(kind, MutationKind::Delete | MutationKind::Clear);

        let authorized = if destructive && self.delete_policy == DeletePolicy::AlwaysPrompt {
            self.session.reauthenticate(message).await
        } else {
            self.session.ensure_authenticated(message).await
        };

        if authorized {
            Ok(())
        } else {
            info!(
                "event=mutation_gate module=service status=denied mutation={}",
                kind.as_str()
            );
            Err(GateError::NotAuthenticated)
        }
    }
}
