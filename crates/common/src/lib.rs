//! # Delegate Common
//!
//! Shared infrastructure plumbing that is independent of the Delegate domain.
//!
//! ## Modules
//! - [`storage`]: pooled SQLite connections, pragmas and storage errors

pub mod storage;

pub use storage::{StorageError, StorageResult};
