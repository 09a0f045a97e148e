//! Application wiring.
//!
//! Builds one session, one list service and one access controller that
//! share the same session handle. Hosts (FFI, CLI) construct a `TodoApp` at
//! startup and keep it for the life of the process.

use crate::auth::gateway::{AuthGateway, DeviceAuthenticator};
use crate::auth::settings::SettingsNavigator;
use crate::config::TodoConfig;
use crate::repo::item_store::ItemStore;
use crate::repo::kv_store::SecureKeyValueStore;
use crate::service::access::AccessController;
use crate::service::todo_service::TodoListService;
use crate::session::state::SessionState;
use std::sync::Arc;

pub struct TodoApp {
    pub session: Arc<SessionState>,
    pub list: TodoListService,
    pub access: AccessController,
}

impl TodoApp {
    /// Wires the core. Must be called inside a tokio runtime.
    pub fn new(
        kv: Arc<dyn SecureKeyValueStore>,
        device: Arc<dyn DeviceAuthenticator>,
        navigator: Arc<dyn SettingsNavigator>,
        config: TodoConfig,
    ) -> Self {
        let session = Arc::new(
            SessionState::new(AuthGateway::new(device)).with_idle_timeout(config.idle_timeout),
        );
        let store = ItemStore::new(kv, config.storage_key.clone());
        let list = TodoListService::new(store, Arc::clone(&session), &config);
        let access = AccessController::new(
            Arc::clone(&session),
            navigator,
            config.prompts.unlock.clone(),
        );
        Self {
            session,
            list,
            access,
        }
    }
}
