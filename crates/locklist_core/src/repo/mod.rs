//! Persistence layer.
//!
//! # Responsibility
//! - Define the secure key-value collaborator contract.
//! - Provide SQLite and in-memory implementations of it.
//! - Persist the item collection as one full-replace JSON snapshot.
//!
//! # Invariants
//! - Only `ItemStore` knows the storage key and wire encoding.

pub mod item_store;
pub mod kv_store;
pub mod memory_kv;
pub mod sqlite_kv;
