//! Flutter bridge for the LockList core.

pub mod api;
mod device;
