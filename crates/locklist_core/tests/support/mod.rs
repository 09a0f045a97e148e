#![allow(dead_code)]

use async_trait::async_trait;
use locklist_core::{
    AuthError, DeviceAuthenticator, EnrollmentLevel, MemoryKeyValueStore, NavigationError,
    PromptOutcome, PromptRequest, SecureKeyValueStore, SettingsNavigator, SettingsTarget,
    StoreError, StoreResult, TodoApp, TodoConfig,
};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Device fake with scripted prompt answers and a prompt counter.
pub struct ScriptedAuthenticator {
    enrollment: Mutex<Result<EnrollmentLevel, AuthError>>,
    answers: Mutex<VecDeque<bool>>,
    default_answer: Mutex<bool>,
    prompts: AtomicUsize,
    messages: Mutex<Vec<String>>,
}

impl ScriptedAuthenticator {
    pub fn new(enrollment: Result<EnrollmentLevel, AuthError>, default_answer: bool) -> Arc<Self> {
        Arc::new(Self {
            enrollment: Mutex::new(enrollment),
            answers: Mutex::new(VecDeque::new()),
            default_answer: Mutex::new(default_answer),
            prompts: AtomicUsize::new(0),
            messages: Mutex::new(Vec::new()),
        })
    }

    /// Biometric device whose user accepts every prompt.
    pub fn accepting() -> Arc<Self> {
        Self::new(Ok(EnrollmentLevel::Biometric), true)
    }

    /// Biometric device whose user cancels every prompt.
    pub fn declining() -> Arc<Self> {
        Self::new(Ok(EnrollmentLevel::Biometric), false)
    }

    pub fn push_answers(&self, answers: &[bool]) {
        self.answers.lock().unwrap().extend(answers.iter().copied());
    }

    pub fn set_default_answer(&self, answer: bool) {
        *self.default_answer.lock().unwrap() = answer;
    }

    pub fn set_enrollment(&self, enrollment: Result<EnrollmentLevel, AuthError>) {
        *self.enrollment.lock().unwrap() = enrollment;
    }

    pub fn prompt_count(&self) -> usize {
        self.prompts.load(Ordering::SeqCst)
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

#[async_trait]
impl DeviceAuthenticator for ScriptedAuthenticator {
    async fn enrollment_level(&self) -> Result<EnrollmentLevel, AuthError> {
        self.enrollment.lock().unwrap().clone()
    }

    async fn prompt(&self, request: &PromptRequest) -> Result<PromptOutcome, AuthError> {
        self.prompts.fetch_add(1, Ordering::SeqCst);
        self.messages.lock().unwrap().push(request.message.clone());
        // Give concurrent callers a chance to run while the prompt is open.
        for _ in 0..3 {
            tokio::task::yield_now().await;
        }
        let answer = self
            .answers
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| *self.default_answer.lock().unwrap());
        if answer {
            Ok(PromptOutcome::succeeded())
        } else {
            Ok(PromptOutcome::failed("user_cancel"))
        }
    }
}

/// Key-value store whose every operation fails.
#[derive(Default)]
pub struct FailingKeyValueStore {
    pub writes: AtomicUsize,
}

#[async_trait]
impl SecureKeyValueStore for FailingKeyValueStore {
    async fn get(&self, _key: &str) -> StoreResult<Option<String>> {
        Err(StoreError::Backend("keychain locked".to_string()))
    }

    async fn set(&self, _key: &str, _value: &str) -> StoreResult<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        Err(StoreError::Backend("keychain locked".to_string()))
    }

    async fn delete(&self, _key: &str) -> StoreResult<()> {
        Err(StoreError::Backend("keychain locked".to_string()))
    }
}

/// Settings navigator that records targets and fails the listed ones.
#[derive(Default)]
pub struct RecordingNavigator {
    pub fail: Vec<SettingsTarget>,
    pub opened: Mutex<Vec<SettingsTarget>>,
}

#[async_trait]
impl SettingsNavigator for RecordingNavigator {
    async fn open(&self, target: SettingsTarget) -> Result<(), NavigationError> {
        self.opened.lock().unwrap().push(target);
        if self.fail.contains(&target) {
            return Err(NavigationError(format!("{} unavailable", target.as_str())));
        }
        Ok(())
    }
}

pub fn app_with(
    kv: Arc<dyn SecureKeyValueStore>,
    device: Arc<ScriptedAuthenticator>,
    config: TodoConfig,
) -> TodoApp {
    TodoApp::new(kv, device, Arc::new(RecordingNavigator::default()), config)
}

/// App over an empty in-memory store with the initial load completed.
pub async fn loaded_app(device: Arc<ScriptedAuthenticator>) -> (TodoApp, Arc<MemoryKeyValueStore>) {
    let kv = Arc::new(MemoryKeyValueStore::new());
    let app = app_with(kv.clone(), device, TodoConfig::default());
    app.list.load().await;
    (app, kv)
}

pub fn titles(items: &[locklist_core::TodoItem]) -> Vec<&str> {
    items.iter().map(|item| item.title.as_str()).collect()
}
