//! # Delegate Infrastructure
//!
//! Infrastructure implementations of core domain ports.
//!
//! This crate contains:
//! - The SQLite record store and its connection manager
//! - Configuration loading
//! - The notification hub, script registry and active-tab tracker
//!
//! ## Architecture
//! - Implements traits defined in `delegate-core`
//! - Depends on `delegate-common` and `delegate-core`
//! - Contains all "impure" code (I/O, shared mutable state)

pub mod broadcast;
pub mod config;
pub mod database;
pub mod errors;
pub mod scripts;
pub mod tabs;

// Re-export commonly used items
pub use broadcast::{BroadcastHub, Subscription};
pub use database::{Database, DbManager, SqliteRecordStore};
pub use errors::InfraError;
pub use scripts::MemoryScriptRegistry;
pub use tabs::TabTracker;
