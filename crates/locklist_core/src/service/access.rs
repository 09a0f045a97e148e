//! Screen-level access decisions.
//!
//! # Responsibility
//! - Decide whether the list UI is unlocked, locked, or must send the user
//!   to device settings because no authentication method is enrolled.
//! - React to app resume, "unlock now" and "lock" actions.
//!
//! # Invariants
//! - An unlocked session never triggers a prompt here.
//! - `lock()` never prompts.
//! - `NeedsSetup` is reported only after a fail-closed availability check.

use crate::auth::settings::{open_security_settings, SettingsNavigator};
use crate::session::state::SessionState;
use log::info;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessState {
    Unlocked,
    Locked,
    /// No passcode or biometric is enrolled on the device.
    NeedsSetup,
}

impl AccessState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unlocked => "unlocked",
            Self::Locked => "locked",
            Self::NeedsSetup => "needs_setup",
        }
    }
}

pub struct AccessController {
    session: Arc<SessionState>,
    navigator: Arc<dyn SettingsNavigator>,
    unlock_message: String,
}

impl AccessController {
    pub fn new(
        session: Arc<SessionState>,
        navigator: Arc<dyn SettingsNavigator>,
        unlock_message: impl Into<String>,
    ) -> Self {
        Self {
            session,
            navigator,
            unlock_message: unlock_message.into(),
        }
    }

    /// Startup check: checks enrollment without prompting.
    pub async fn refresh(&self) -> AccessState {
        let state = if !self.session.gateway().is_auth_available().await {
            AccessState::NeedsSetup
        } else if self.session.is_authenticated() {
            AccessState::Unlocked
        } else {
            AccessState::Locked
        };
        info!("event=access_refresh module=service status=ok state={}", state.as_str());
        state
    }

    /// App returned to the foreground.
    pub async fn on_app_active(&self) -> AccessState {
        self.unlock("resume").await
    }

    /// Explicit "unlock now" action.
    pub async fn unlock_now(&self) -> AccessState {
        self.unlock("button").await
    }

    /// Explicit "lock app" action.
    pub fn lock(&self) -> AccessState {
        self.session.lock();
        AccessState::Locked
    }

    /// Sends the user to device security settings.
    pub async fn open_settings(&self) {
        open_security_settings(self.navigator.as_ref()).await;
    }

    async fn unlock(&self, trigger: &'static str) -> AccessState {
        if self.session.is_authenticated() {
            return AccessState::Unlocked;
        }
        if self.session.ensure_authenticated(&self.unlock_message).await {
            info!("event=access_unlock module=service status=ok trigger={trigger}");
            return AccessState::Unlocked;
        }

        let state = if self.session.gateway().is_auth_available().await {
            AccessState::Locked
        } else {
            AccessState::NeedsSetup
        };
        info!(
            "event=access_unlock module=service status=denied trigger={trigger} state={}",
            state.as_str()
        );
        state
    }
}
