//! Ordered listener registry for session state changes.
//!
//! # Invariants
//! - Listeners run in registration order.
//! - A panicking listener never prevents later listeners from running.
//! - A subscription removes only its own registration.

use log::warn;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

/// Callback invoked with the new `authenticated` value.
pub type AuthListener = Arc<dyn Fn(bool) + Send + Sync>;

#[derive(Default)]
struct Registry {
    next_id: u64,
    entries: Vec<(u64, AuthListener)>,
}

/// Shared, cloneable listener list.
#[derive(Clone, Default)]
pub struct ListenerSet {
    inner: Arc<Mutex<Registry>>,
}

impl ListenerSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, listener: AuthListener) -> AuthSubscription {
        let mut registry = lock_registry(&self.inner);
        let id = registry.next_id;
        registry.next_id += 1;
        registry.entries.push((id, listener));
        AuthSubscription {
            id,
            registry: Arc::downgrade(&self.inner),
        }
    }

    pub fn len(&self) -> usize {
        lock_registry(&self.inner).entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Calls every listener with `authenticated`.
    ///
    /// Runs on a snapshot taken before the first call, so listeners may
    /// subscribe or unsubscribe while being notified.
    pub fn notify(&self, authenticated: bool) {
        let snapshot: Vec<(u64, AuthListener)> = lock_registry(&self.inner).entries.clone();
        for (id, listener) in snapshot {
            let result = panic::catch_unwind(AssertUnwindSafe(|| listener(authenticated)));
            if result.is_err() {
                warn!(
                    "event=session_notify module=session status=listener_panicked listener_id={id}"
                );
            }
        }
    }
}

/// Handle that removes one registered listener.
///
/// Dropping the handle keeps the listener registered.
#[derive(Debug)]
pub struct AuthSubscription {
    id: u64,
    registry: Weak<Mutex<Registry>>,
}

impl AuthSubscription {
    /// Removes the listener. Returns `false` when it was already removed.
    pub fn unsubscribe(&self) -> bool {
        let Some(registry) = self.registry.upgrade() else {
            return false;
        };
        let mut registry = lock_registry(&registry);
        let before = registry.entries.len();
        registry.entries.retain(|(id, _)| *id != self.id);
        registry.entries.len() != before
    }
}

fn lock_registry(registry: &Mutex<Registry>) -> MutexGuard<'_, Registry> {
    registry.lock().unwrap_or_else(PoisonError::into_inner)
}
