//! Command-line options for the console harness.

use clap::{Parser, ValueEnum};
use locklist_core::EnrollmentLevel;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "locklist")]
#[command(about = "LockList console harness - a session-gated todo list", long_about = None)]
pub struct Cli {
    /// SQLite file holding the secure key-value store
    #[arg(env = "LOCKLIST_DB_PATH", default_value = "locklist.sqlite3")]
    pub db_path: PathBuf,

    /// Absolute directory for rolling log files; logging is off when unset
    #[arg(long, env = "LOCKLIST_LOG_DIR")]
    pub log_dir: Option<String>,

    /// Authentication the simulated device has enrolled
    #[arg(
        long,
        value_enum,
        env = "LOCKLIST_CLI_ENROLLMENT",
        default_value_t = Enrollment::DeviceCredential
    )]
    pub enrollment: Enrollment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Enrollment {
    None,
    DeviceCredential,
    Biometric,
}

impl From<Enrollment> for EnrollmentLevel {
    fn from(value: Enrollment) -> Self {
        match value {
            Enrollment::None => EnrollmentLevel::None,
            Enrollment::DeviceCredential => EnrollmentLevel::DeviceCredential,
            Enrollment::Biometric => EnrollmentLevel::Biometric,
        }
    }
}
