//! Device settings navigation.
//!
//! Purely advisory: the core asks the platform to show the security settings
//! page and never waits on, or reports, the outcome.

use async_trait::async_trait;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingsTarget {
    /// Screen where the user enrolls a passcode or biometric.
    Security,
    /// Generic app/system settings screen.
    General,
}

impl SettingsTarget {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Security => "security",
            Self::General => "general",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationError(pub String);

impl Display for NavigationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "settings navigation failed: {}", self.0)
    }
}

impl Error for NavigationError {}

#[async_trait]
pub trait SettingsNavigator: Send + Sync {
    async fn open(&self, target: SettingsTarget) -> Result<(), NavigationError>;
}

/// Opens security settings, falling back to the general settings screen.
pub async fn open_security_settings(navigator: &dyn SettingsNavigator) {
    let err = match navigator.open(SettingsTarget::Security).await {
        Ok(()) => {
            info!("event=open_settings module=auth status=ok target=security");
            return;
        }
        Err(err) => err,
    };
    warn!("event=open_settings module=auth status=fallback target=security error={err}");

    match navigator.open(SettingsTarget::General).await {
        Ok(()) => info!("event=open_settings module=auth status=ok target=general"),
        Err(err) => {
            warn!("event=open_settings module=auth status=error target=general error={err}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{open_security_settings, NavigationError, SettingsNavigator, SettingsTarget};
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct RecordingNavigator {
        fail: Vec<SettingsTarget>,
        opened: Mutex<Vec<SettingsTarget>>,
    }

    #[async_trait]
    impl SettingsNavigator for RecordingNavigator {
        async fn open(&self, target: SettingsTarget) -> Result<(), NavigationError> {
            self.opened.lock().unwrap().push(target);
            if self.fail.contains(&target) {
                return Err(NavigationError(format!("{} unsupported", target.as_str())));
            }
            Ok(())
        }
    }

    #[tokio::test]
    async fn security_page_is_tried_first() {
        let navigator = RecordingNavigator {
            fail: Vec::new(),
            opened: Mutex::new(Vec::new()),
        };
        open_security_settings(&navigator).await;
        assert_eq!(*navigator.opened.lock().unwrap(), vec![SettingsTarget::Security]);
    }

    #[tokio::test]
    async fn falls_back_to_general_and_swallows_final_failure() {
        let navigator = RecordingNavigator {
            fail: vec![SettingsTarget::Security, SettingsTarget::General],
            opened: Mutex::new(Vec::new()),
        };
        open_security_settings(&navigator).await;
        assert_eq!(
            *navigator.opened.lock().unwrap(),
            vec![SettingsTarget::Security, SettingsTarget::General]
        );
    }
}
