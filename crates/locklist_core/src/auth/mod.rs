//! Device authentication boundary.
//!
//! # Responsibility
//! - Describe the device authenticator and settings navigator collaborators.
//! - Collapse every collaborator failure into a fail-closed boolean.
//!
//! # Invariants
//! - No `AuthError` or `NavigationError` escapes this module's helpers.

pub mod gateway;
pub mod settings;
