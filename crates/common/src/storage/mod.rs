//! Storage layer
//!
//! r2d2-pooled SQLite connections configured with per-connection pragmas.
//! Schema ownership stays with the application: this module only hands out
//! connections.

pub mod error;
pub mod sqlite;

pub use error::{StorageError, StorageResult};
pub use sqlite::{SqliteConnection, SqlitePool, SqlitePoolConfig};
