//! Core domain logic for LockList.
//! This crate is the single source of truth for the session-gated to-do model.

pub mod app;
pub mod auth;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod session;

pub use app::TodoApp;
pub use auth::gateway::{
    AuthError, AuthGateway, DeviceAuthenticator, EnrollmentLevel, PromptOutcome, PromptRequest,
};
pub use auth::settings::{NavigationError, SettingsNavigator, SettingsTarget};
pub use config::{DeletePolicy, PromptMessages, TodoConfig};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::collection::ItemCollection;
pub use model::item::{ItemPatch, TodoId, TodoItem, TodoValidationError};
pub use repo::item_store::{ItemStore, DEFAULT_STORAGE_KEY};
pub use repo::kv_store::{SecureKeyValueStore, StoreError, StoreResult};
pub use repo::memory_kv::MemoryKeyValueStore;
pub use repo::sqlite_kv::SqliteKeyValueStore;
pub use service::access::{AccessController, AccessState};
pub use service::gate::{GateError, MutationGate, MutationKind};
pub use service::todo_service::{ServiceResult, TodoListService, TodoServiceError};
pub use session::listeners::AuthSubscription;
pub use session::state::{SessionPhase, SessionState};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
