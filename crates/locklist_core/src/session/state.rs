//! Session state machine: `Locked` ⇄ `Unlocked`.
//!
//! # Invariants
//! - Initial state is `Locked`.
//! - `Locked -> Unlocked` only after a successful device prompt.
//! - `Unlocked -> Locked` only through `lock()` or the idle timeout.
//! - Listeners fire only when the value actually changes.
//! - Device prompts never overlap; a caller that arrives while a prompt is
//!   outstanding waits for it and reuses its result.

use crate::auth::gateway::AuthGateway;
use crate::session::listeners::{AuthSubscription, ListenerSet};
use log::{debug, info};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};
use tokio::sync::Mutex as PromptGuard;

/// Observable session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Locked,
    Unlocked,
}

pub struct SessionState {
    authenticated: AtomicBool,
    gateway: AuthGateway,
    listeners: ListenerSet,
    prompt_guard: PromptGuard<()>,
    idle_timeout: Option<Duration>,
    last_activity: Mutex<Option<Instant>>,
}

impl SessionState {
    /// Creates a locked session without idle auto-lock.
    pub fn new(gateway: AuthGateway) -> Self {
        Self {
            authenticated: AtomicBool::new(false),
            gateway,
            listeners: ListenerSet::new(),
            prompt_guard: PromptGuard::new(()),
            idle_timeout: None,
            last_activity: Mutex::new(None),
        }
    }

    /// Locks an unlocked session once it has been idle longer than `timeout`.
    pub fn with_idle_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.idle_timeout = timeout;
        self
    }

    pub fn gateway(&self) -> &AuthGateway {
        &self.gateway
    }

    pub fn idle_timeout(&self) -> Option<Duration> {
        self.idle_timeout
    }

    /// Current cached value, after applying the idle timeout.
    pub fn is_authenticated(&self) -> bool {
        self.expire_if_idle();
        self.authenticated.load(Ordering::SeqCst)
    }

    pub fn phase(&self) -> SessionPhase {
        if self.is_authenticated() {
            SessionPhase::Unlocked
        } else {
            SessionPhase::Locked
        }
    }

    /// Sets the cached value and notifies listeners when it changed.
    pub fn set_authenticated(&self, authenticated: bool) {
        if authenticated {
            self.touch();
        }
        let previous = self.authenticated.swap(authenticated, Ordering::SeqCst);
        if previous == authenticated {
            return;
        }
        info!(
            "event=session_change module=session status=ok authenticated={authenticated} listeners={}",
            self.listeners.len()
        );
        self.listeners.notify(authenticated);
    }

    /// Registers a change listener.
    pub fn add_listener<F>(&self, listener: F) -> AuthSubscription
    where
        F: Fn(bool) + Send + Sync + 'static,
    {
        self.listeners.subscribe(Arc::new(listener))
    }

    /// Explicit user lock action.
    pub fn lock(&self) {
        self.set_authenticated(false);
    }

    /// Returns `true` when the session is (or becomes) unlocked.
    ///
    /// An unlocked session answers immediately without prompting.
    pub async fn ensure_authenticated(&self, message: &str) -> bool {
        if self.is_authenticated() {
            self.touch();
            return true;
        }

        let _in_flight = self.prompt_guard.lock().await;
        if self.is_authenticated() {
            debug!("event=session_ensure module=session status=ok source=concurrent_prompt");
            self.touch();
            return true;
        }

        if self.gateway.require_auth(message).await {
            self.set_authenticated(true);
            return true;
        }
        false
    }

    /// Prompts even when already unlocked.
    ///
    /// Success unlocks the session; failure leaves the current state alone.
    pub async fn reauthenticate(&self, message: &str) -> bool {
        let _in_flight = self.prompt_guard.lock().await;
        if self.gateway.require_auth(message).await {
            self.set_authenticated(true);
            return true;
        }
        false
    }

    fn touch(&self) {
        *self
            .last_activity
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(Instant::now());
    }

    fn expire_if_idle(&self) {
        let Some(timeout) = self.idle_timeout else {
            return;
        };
        if !self.authenticated.load(Ordering::SeqCst) {
            return;
        }
        let last_activity = *self
            .last_activity
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let idle = last_activity.map_or(true, |at| at.elapsed() >= timeout);
        if idle {
            info!("event=session_idle_lock module=session status=ok");
            self.set_authenticated(false);
        }
    }
}
