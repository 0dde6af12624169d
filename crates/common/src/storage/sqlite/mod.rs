//! Pooled SQLite connections

pub mod config;
pub mod pool;
pub mod pragmas;

pub use config::SqlitePoolConfig;
pub use pool::{PoolStatus, SqliteConnection, SqlitePool};
