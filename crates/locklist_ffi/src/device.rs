//! Dart-backed implementations of the core's device collaborators.
//!
//! # Invariants
//! - Unknown enrollment labels fail closed (`AuthError::Device`).
//! - A `false` from the Dart prompt is a denied prompt, not an error.
//! - The Dart prompt receives every field of the core's `PromptRequest`.

use crate::api::AuthPromptView;
use async_trait::async_trait;
use flutter_rust_bridge::DartFnFuture;
use locklist_core::{
    AuthError, DeviceAuthenticator, EnrollmentLevel, NavigationError, PromptOutcome,
    PromptRequest, SettingsNavigator, SettingsTarget,
};

pub(crate) type EnrollmentCallback = Box<dyn Fn() -> DartFnFuture<String> + Send + Sync>;
pub(crate) type PromptCallback = Box<dyn Fn(AuthPromptView) -> DartFnFuture<bool> + Send + Sync>;
pub(crate) type SettingsCallback = Box<dyn Fn(String) -> DartFnFuture<bool> + Send + Sync>;

pub(crate) struct DartAuthenticator {
    pub(crate) enrollment: EnrollmentCallback,
    pub(crate) prompt: PromptCallback,
}

#[async_trait]
impl DeviceAuthenticator for DartAuthenticator {
    async fn enrollment_level(&self) -> Result<EnrollmentLevel, AuthError> {
        let label = (self.enrollment)().await;
        parse_enrollment(&label)
    }

    async fn prompt(&self, request: &PromptRequest) -> Result<PromptOutcome, AuthError> {
        if (self.prompt)(prompt_view(request)).await {
            Ok(PromptOutcome::succeeded())
        } else {
            Ok(PromptOutcome::failed("dart_prompt_declined"))
        }
    }
}

fn prompt_view(request: &PromptRequest) -> AuthPromptView {
    AuthPromptView {
        message: request.message.clone(),
        fallback_label: request.fallback_label.clone(),
        allow_device_fallback: request.allow_device_fallback,
    }
}

pub(crate) struct DartSettingsNavigator {
    pub(crate) open: SettingsCallback,
}

#[async_trait]
impl SettingsNavigator for DartSettingsNavigator {
    async fn open(&self, target: SettingsTarget) -> Result<(), NavigationError> {
        if (self.open)(target.as_str().to_string()).await {
            Ok(())
        } else {
            Err(NavigationError(format!(
                "host could not open {} settings",
                target.as_str()
            )))
        }
    }
}

/// Maps the Dart-side enrollment label (`none|device_credential|biometric`).
pub(crate) fn parse_enrollment(label: &str) -> Result<EnrollmentLevel, AuthError> {
    match label.trim() {
        "none" => Ok(EnrollmentLevel::None),
        "device_credential" => Ok(EnrollmentLevel::DeviceCredential),
        "biometric" => Ok(EnrollmentLevel::Biometric),
        "unavailable" => Err(AuthError::Unavailable),
        other => Err(AuthError::Device(format!("unknown enrollment label `{other}`"))),
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_enrollment, DartAuthenticator};
    use crate::api::AuthPromptView;
    use flutter_rust_bridge::DartFnFuture;
    use locklist_core::{AuthError, DeviceAuthenticator, EnrollmentLevel, PromptRequest};
    use std::sync::{Arc, Mutex};

    fn recording_authenticator(
        answer: bool,
    ) -> (DartAuthenticator, Arc<Mutex<Vec<AuthPromptView>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let device = DartAuthenticator {
            enrollment: Box::new(|| -> DartFnFuture<String> {
                Box::pin(async { "biometric".to_string() })
            }),
            prompt: Box::new(move |view| -> DartFnFuture<bool> {
                sink.lock().unwrap().push(view);
                Box::pin(async move { answer })
            }),
        };
        (device, seen)
    }

    #[tokio::test]
    async fn prompt_forwards_fallback_settings() {
        let (device, seen) = recording_authenticator(true);
        let request = PromptRequest {
            message: "Authenticate to delete TODO".to_string(),
            fallback_label: "Use PIN".to_string(),
            allow_device_fallback: false,
        };

        let outcome = device.prompt(&request).await.unwrap();

        assert!(outcome.success);
        assert_eq!(
            seen.lock().unwrap().as_slice(),
            &[AuthPromptView {
                message: "Authenticate to delete TODO".to_string(),
                fallback_label: "Use PIN".to_string(),
                allow_device_fallback: false,
            }]
        );
    }

    #[tokio::test]
    async fn declined_prompt_is_a_failed_outcome() {
        let (device, seen) = recording_authenticator(false);

        let outcome = device
            .prompt(&PromptRequest::new("Unlock to access your todos"))
            .await
            .unwrap();

        assert!(!outcome.success);
        let seen = seen.lock().unwrap();
        assert!(seen[0].allow_device_fallback);
        assert_eq!(seen[0].fallback_label, "Use device passcode");
    }

    #[test]
    fn parses_known_enrollment_labels() {
        assert_eq!(parse_enrollment("none"), Ok(EnrollmentLevel::None));
        assert_eq!(
            parse_enrollment(" device_credential "),
            Ok(EnrollmentLevel::DeviceCredential)
        );
        assert_eq!(parse_enrollment("biometric"), Ok(EnrollmentLevel::Biometric));
    }

    #[test]
    fn unknown_labels_fail_closed() {
        assert_eq!(parse_enrollment("unavailable"), Err(AuthError::Unavailable));
        assert!(matches!(
            parse_enrollment("Biometric"),
            Err(AuthError::Device(_))
        ));
    }
}
