//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose stable, use-case-level functions to Dart via FRB.
//! - Run core work on one process-wide tokio runtime.
//! - Translate core results into flat response envelopes.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - `todo_init` wires the core once per process; later calls reuse it.
//! - Item titles never appear in log lines emitted here.

use crate::device::{DartAuthenticator, DartSettingsNavigator};
use flutter_rust_bridge::DartFnFuture;
use locklist_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    ItemPatch, SqliteKeyValueStore, TodoApp, TodoConfig, TodoId, TodoItem, TodoServiceError,
};
use log::{error, info};
use once_cell::sync::OnceCell;
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::runtime::{Builder, Runtime};

const DB_FILE_NAME: &str = "locklist.sqlite3";
const DB_PATH_ENV: &str = "LOCKLIST_DB_PATH";
const CORE_WORKER_THREADS: usize = 2;

static CORE_RUNTIME: OnceCell<Runtime> = OnceCell::new();
static APP: OnceCell<Arc<TodoApp>> = OnceCell::new();

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Sync call; may perform small file-system setup work.
/// - Idempotent for the same `level + log_dir`; conflicting calls fail.
/// - Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Native prompt parameters handed to the Dart `authenticate` callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthPromptView {
    pub message: String,
    /// Label of the passcode fallback button.
    pub fallback_label: String,
    /// Whether the prompt may fall back from biometrics to the passcode.
    pub allow_device_fallback: bool,
}

/// One to-do item as seen by Dart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoItemView {
    pub id: String,
    pub title: String,
    pub completed: bool,
    /// RFC 3339 creation timestamp.
    pub created_at: String,
}

/// Item list envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoListResponse {
    pub ok: bool,
    /// Items, newest first (empty on failure).
    pub items: Vec<TodoItemView>,
    pub message: String,
}

/// Envelope for one list mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoActionResponse {
    /// Whether the mutation was accepted.
    pub ok: bool,
    /// Item after the mutation, when one applies.
    pub item: Option<TodoItemView>,
    /// Stable code: `validation|not_authenticated|not_loaded|not_initialized|internal`.
    pub error_code: Option<String>,
    /// Human-readable message for UI.
    pub message: String,
}

impl TodoActionResponse {
    fn success(message: impl Into<String>, item: Option<TodoItemView>) -> Self {
        Self {
            ok: true,
            item,
            error_code: None,
            message: message.into(),
        }
    }

    fn failure(code: &str, message: impl Into<String>) -> Self {
        Self {
            ok: false,
            item: None,
            error_code: Some(code.to_string()),
            message: message.into(),
        }
    }

    fn from_service_error(err: TodoServiceError) -> Self {
        match err {
            TodoServiceError::Validation(_) => {
                Self::failure("validation", "Field required: please enter something.")
            }
            TodoServiceError::NotAuthenticated => Self::failure(
                "not_authenticated",
                "Not authenticated. Please unlock the app before changing todos.",
            ),
            TodoServiceError::NotLoaded => {
                Self::failure("not_loaded", "Todos are still loading.")
            }
        }
    }
}

/// Wires the core to Dart device callbacks and loads persisted items.
///
/// Callbacks:
/// - `enrollment_level`: resolves to `none|device_credential|biometric`.
/// - `authenticate`: shows the native prompt described by `AuthPromptView`.
/// - `open_settings`: opens `security` or `general` settings.
///
/// # FFI contract
/// - Async; first call opens the store (`db_path`, else `LOCKLIST_DB_PATH`,
///   else the temp dir).
/// - Later calls ignore their arguments and return the current items.
/// - Never panics.
pub async fn todo_init(
    db_path: Option<String>,
    enrollment_level: impl Fn() -> DartFnFuture<String> + Send + Sync + 'static,
    authenticate: impl Fn(AuthPromptView) -> DartFnFuture<bool> + Send + Sync + 'static,
    open_settings: impl Fn(String) -> DartFnFuture<bool> + Send + Sync + 'static,
) -> TodoListResponse {
    let runtime = match core_runtime() {
        Ok(runtime) => runtime,
        Err(message) => return list_failure(message),
    };

    let app = APP.get_or_try_init(|| -> Result<Arc<TodoApp>, String> {
        let path = resolve_db_path(db_path);
        let kv = SqliteKeyValueStore::open(&path)
            .map_err(|err| format!("todo_init failed to open store: {err}"))?;
        let device = DartAuthenticator {
            enrollment: Box::new(enrollment_level),
            prompt: Box::new(authenticate),
        };
        let navigator = DartSettingsNavigator {
            open: Box::new(open_settings),
        };
        let _runtime_context = runtime.enter();
        info!("event=ffi_init module=ffi status=ok");
        Ok(Arc::new(TodoApp::new(
            Arc::new(kv),
            Arc::new(device),
            Arc::new(navigator),
            TodoConfig::default(),
        )))
    });

    match app {
        Ok(_) => todo_list().await,
        Err(message) => {
            error!("event=ffi_init module=ffi status=error");
            list_failure(message)
        }
    }
}

/// Returns current items, loading them first if needed.
pub async fn todo_list() -> TodoListResponse {
    match on_core(|app| async move { app.list.load().await }).await {
        Ok(items) => TodoListResponse {
            ok: true,
            message: if items.is_empty() {
                "No todos yet".to_string()
            } else {
                format!("{} todo(s).", items.len())
            },
            items: items.iter().map(to_view).collect(),
        },
        Err(message) => list_failure(message),
    }
}

/// Adds a todo. Prompts for authentication when the session is locked.
pub async fn todo_add(title: String) -> TodoActionResponse {
    let result = on_core(|app| async move { app.list.add_item(&title).await }).await;
    match result {
        Ok(Ok(item)) => TodoActionResponse::success("Todo added.", Some(to_view(&item))),
        Ok(Err(err)) => TodoActionResponse::from_service_error(err),
        Err(message) => core_unavailable(message),
    }
}

/// Updates title and/or completion of a todo.
pub async fn todo_update(
    id: String,
    title: Option<String>,
    completed: Option<bool>,
) -> TodoActionResponse {
    let patch = ItemPatch { title, completed };
    let result = on_core(|app| async move {
        app.list.update_item(&TodoId::from(id), &patch).await
    })
    .await;
    match result {
        Ok(Ok(Some(item))) => TodoActionResponse::success("Todo updated.", Some(to_view(&item))),
        Ok(Ok(None)) => TodoActionResponse::success("Todo not found; nothing changed.", None),
        Ok(Err(err)) => TodoActionResponse::from_service_error(err),
        Err(message) => core_unavailable(message),
    }
}

/// Deletes a todo. Unknown ids succeed without changes.
pub async fn todo_delete(id: String) -> TodoActionResponse {
    let result =
        on_core(|app| async move { app.list.delete_item(&TodoId::from(id)).await }).await;
    match result {
        Ok(Ok(true)) => TodoActionResponse::success("Todo deleted.", None),
        Ok(Ok(false)) => TodoActionResponse::success("Todo not found; nothing changed.", None),
        Ok(Err(err)) => TodoActionResponse::from_service_error(err),
        Err(message) => core_unavailable(message),
    }
}

/// Deletes every todo and the persisted copy.
pub async fn todo_clear() -> TodoActionResponse {
    match on_core(|app| async move { app.list.clear_all().await }).await {
        Ok(Ok(removed)) => TodoActionResponse::success(format!("Removed {removed} todo(s)."), None),
        Ok(Err(err)) => TodoActionResponse::from_service_error(err),
        Err(message) => core_unavailable(message),
    }
}

/// Current cached session value. `false` before `todo_init`.
#[flutter_rust_bridge::frb(sync)]
pub fn session_is_authenticated() -> bool {
    APP.get()
        .map(|app| app.session.is_authenticated())
        .unwrap_or(false)
}

/// Locks the session. Returns the resulting access state label.
#[flutter_rust_bridge::frb(sync)]
pub fn session_lock() -> String {
    match APP.get() {
        Some(app) => app.access.lock().as_str().to_string(),
        None => "locked".to_string(),
    }
}

/// Startup access check (`unlocked|locked|needs_setup`). Never prompts.
pub async fn access_refresh() -> String {
    access_label(on_core(|app| async move { app.access.refresh().await }).await)
}

/// App returned to foreground; prompts once when locked.
pub async fn access_on_resume() -> String {
    access_label(on_core(|app| async move { app.access.on_app_active().await }).await)
}

/// Explicit "Unlock now" button.
pub async fn access_unlock_now() -> String {
    access_label(on_core(|app| async move { app.access.unlock_now().await }).await)
}

/// Opens device security settings (falls back to general settings).
pub async fn access_open_settings() {
    if let Err(message) = on_core(|app| async move { app.access.open_settings().await }).await {
        error!("event=ffi_open_settings module=ffi status=error error={message}");
    }
}

fn core_runtime() -> Result<&'static Runtime, String> {
    CORE_RUNTIME.get_or_try_init(|| {
        Builder::new_multi_thread()
            .worker_threads(CORE_WORKER_THREADS)
            .thread_name("locklist-core")
            .enable_all()
            .build()
            .map_err(|err| format!("failed to start core runtime: {err}"))
    })
}

async fn on_core<T, F, Fut>(task: F) -> Result<T, String>
where
    F: FnOnce(Arc<TodoApp>) -> Fut,
    Fut: Future<Output = T> + Send + 'static,
    T: Send + 'static,
{
    let app = APP
        .get()
        .cloned()
        .ok_or_else(|| "todo_init must be called first".to_string())?;
    let runtime = core_runtime()?;
    runtime
        .spawn(task(app))
        .await
        .map_err(|err| format!("core task failed: {err}"))
}

fn resolve_db_path(explicit: Option<String>) -> PathBuf {
    let from_env = std::env::var(DB_PATH_ENV).ok();
    [explicit, from_env]
        .into_iter()
        .flatten()
        .map(|raw| raw.trim().to_string())
        .find(|raw| !raw.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| std::env::temp_dir().join(DB_FILE_NAME))
}

fn to_view(item: &TodoItem) -> TodoItemView {
    TodoItemView {
        id: item.id.to_string(),
        title: item.title.clone(),
        completed: item.completed,
        created_at: item.created_at.to_rfc3339(),
    }
}

fn list_failure(message: String) -> TodoListResponse {
    TodoListResponse {
        ok: false,
        items: Vec::new(),
        message,
    }
}

fn core_unavailable(message: String) -> TodoActionResponse {
    let code = if APP.get().is_none() {
        "not_initialized"
    } else {
        "internal"
    };
    TodoActionResponse::failure(code, message)
}

fn access_label(result: Result<locklist_core::AccessState, String>) -> String {
    match result {
        Ok(state) => state.as_str().to_string(),
        Err(message) => {
            error!("event=ffi_access module=ffi status=error error={message}");
            "locked".to_string()
        }
    }
}
