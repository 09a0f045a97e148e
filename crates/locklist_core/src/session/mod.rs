//! Process-lifetime authentication session.
//!
//! # Responsibility
//! - Cache whether the user authenticated since the last lock.
//! - Fan state changes out to subscribed listeners.
//!
//! # Invariants
//! - A session starts locked and is never persisted.
//! - At most one device prompt is outstanding per session.

pub mod listeners;
pub mod state;
