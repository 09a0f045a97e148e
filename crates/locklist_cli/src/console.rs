//! Terminal stand-ins for the device collaborators.
//!
//! # Invariants
//! - The prompt shares the command loop's stdin reader, so a prompt answer
//!   is never consumed as a command.
//! - End of input answers every prompt with "no".

use async_trait::async_trait;
use locklist_core::{
    AuthError, DeviceAuthenticator, EnrollmentLevel, NavigationError, PromptOutcome,
    PromptRequest, SettingsNavigator, SettingsTarget,
};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::Mutex;

pub type SharedInput = Arc<Mutex<Lines<BufReader<Stdin>>>>;

pub fn shared_stdin() -> SharedInput {
    Arc::new(Mutex::new(BufReader::new(tokio::io::stdin()).lines()))
}

/// Reads one line, treating read errors like end of input.
pub async fn read_line(input: &SharedInput) -> Option<String> {
    input.lock().await.next_line().await.ok().flatten()
}

pub struct ConsoleAuthenticator {
    enrollment: EnrollmentLevel,
    input: SharedInput,
}

impl ConsoleAuthenticator {
    pub fn new(enrollment: EnrollmentLevel, input: SharedInput) -> Self {
        Self { enrollment, input }
    }
}

#[async_trait]
impl DeviceAuthenticator for ConsoleAuthenticator {
    async fn enrollment_level(&self) -> Result<EnrollmentLevel, AuthError> {
        Ok(self.enrollment)
    }

    async fn prompt(&self, request: &PromptRequest) -> Result<PromptOutcome, AuthError> {
        if !self.enrollment.allows_authentication() {
            return Err(AuthError::Unavailable);
        }
        println!("[auth] {} (y/n, {})", request.message, request.fallback_label);
        match read_line(&self.input).await {
            Some(answer) if answer.trim().eq_ignore_ascii_case("y") => {
                Ok(PromptOutcome::succeeded())
            }
            Some(_) => Ok(PromptOutcome::failed("user_cancel")),
            None => Ok(PromptOutcome::failed("input_closed")),
        }
    }
}

pub struct ConsoleSettingsNavigator;

#[async_trait]
impl SettingsNavigator for ConsoleSettingsNavigator {
    async fn open(&self, target: SettingsTarget) -> Result<(), NavigationError> {
        match target {
            SettingsTarget::Security => Err(NavigationError(
                "no security settings page on this platform".to_string(),
            )),
            SettingsTarget::General => {
                println!("[settings] enroll a passcode in your system settings, then `unlock`.");
                Ok(())
            }
        }
    }
}
