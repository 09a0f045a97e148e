//! To-do domain model.
//!
//! # Responsibility
//! - Define the persisted to-do record and its partial-update request.
//! - Hold the in-memory, newest-first item collection and its load state.
//!
//! # Invariants
//! - Every item is identified by a stable `TodoId` that is never reused.
//! - Titles are stored trimmed and never empty.

pub mod collection;
pub mod item;
