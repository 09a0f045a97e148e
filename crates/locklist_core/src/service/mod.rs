//! Use-case services.
//!
//! # Responsibility
//! - Gate list mutations behind the authentication session.
//! - Keep the in-memory list and its persisted mirror in step.
//! - Derive screen-level access state.
//!
//! # Invariants
//! - Services never bypass the mutation gate.
//! - Services stay storage-agnostic and device-agnostic.

pub mod access;
pub mod gate;
pub mod persist;
pub mod todo_service;
