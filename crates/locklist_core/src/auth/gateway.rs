//! Authentication gateway over the device authenticator.
//!
//! # Invariants
//! - `is_auth_available` never prompts the user.
//! - Both operations fail closed: any error reads as "no".

use async_trait::async_trait;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;
use std::time::Instant;

/// Label the device shows for its passcode fallback.
pub const DEFAULT_FALLBACK_LABEL: &str = "Use device passcode";
/// Message used when a caller does not provide one.
pub const DEFAULT_PROMPT_MESSAGE: &str = "Authenticate to proceed";

/// Strongest authentication factor configured on the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EnrollmentLevel {
    None,
    /// PIN, pattern or passcode.
    DeviceCredential,
    Biometric,
}

impl EnrollmentLevel {
    pub fn allows_authentication(self) -> bool {
        !matches!(self, Self::None)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::DeviceCredential => "device_credential",
            Self::Biometric => "biometric",
        }
    }
}

/// Native prompt parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptRequest {
    pub message: String,
    pub fallback_label: String,
    /// Lets the user fall back from biometrics to the device passcode.
    pub allow_device_fallback: bool,
}

impl PromptRequest {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            fallback_label: DEFAULT_FALLBACK_LABEL.to_string(),
            allow_device_fallback: true,
        }
    }
}

/// Result reported by the device prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptOutcome {
    pub success: bool,
    /// Device-specific reason such as `user_cancel` or `lockout`.
    pub error_reason: Option<String>,
}

impl PromptOutcome {
    pub fn succeeded() -> Self {
        Self {
            success: true,
            error_reason: None,
        }
    }

    pub fn failed(reason: impl Into<String>) -> Self {
        Self {
            success: false,
            error_reason: Some(reason.into()),
        }
    }
}

/// Failure raised by a device authenticator implementation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// No authentication hardware or API on this device.
    Unavailable,
    Device(String),
}

impl Display for AuthError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unavailable => write!(f, "device authentication is unavailable"),
            Self::Device(message) => write!(f, "device authentication failed: {message}"),
        }
    }
}

impl Error for AuthError {}

/// Platform authentication capability (biometrics or device credential).
#[async_trait]
pub trait DeviceAuthenticator: Send + Sync {
    /// Read-only enrollment check; must not show any UI.
    async fn enrollment_level(&self) -> Result<EnrollmentLevel, AuthError>;
    /// Shows the native challenge and reports its result.
    async fn prompt(&self, request: &PromptRequest) -> Result<PromptOutcome, AuthError>;
}

/// Fail-closed wrapper around a [`DeviceAuthenticator`].
#[derive(Clone)]
pub struct AuthGateway {
    device: Arc<dyn DeviceAuthenticator>,
}

impl AuthGateway {
    pub fn new(device: Arc<dyn DeviceAuthenticator>) -> Self {
        Self { device }
    }

    /// Returns whether the device has any authentication method enrolled.
    pub async fn is_auth_available(&self) -> bool {
        match self.device.enrollment_level().await {
            Ok(level) => {
                info!(
                    "event=auth_enrollment module=auth status=ok enrollment={}",
                    level.as_str()
                );
                level.allows_authentication()
            }
            Err(err) => {
                warn!("event=auth_enrollment module=auth status=error error={err}");
                false
            }
        }
    }

    /// Prompts the user and returns `true` only on explicit device success.
    pub async fn require_auth(&self, message: &str) -> bool {
        let started_at = Instant::now();
        let request = PromptRequest::new(message);
        match self.device.prompt(&request).await {
            Ok(outcome) if outcome.success => {
                info!(
                    "event=auth_prompt module=auth status=ok duration_ms={}",
                    started_at.elapsed().as_millis()
                );
                true
            }
            Ok(outcome) => {
                info!(
                    "event=auth_prompt module=auth status=denied reason={} duration_ms={}",
                    outcome.error_reason.as_deref().unwrap_or("unknown"),
                    started_at.elapsed().as_millis()
                );
                false
            }
            Err(err) => {
                warn!(
                    "event=auth_prompt module=auth status=error duration_ms={} error={err}",
                    started_at.elapsed().as_millis()
                );
                false
            }
        }
    }
}
