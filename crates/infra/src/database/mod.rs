//! Database implementations

pub mod lazy;
pub mod manager;
pub mod record_store;

pub use lazy::Database;
pub use manager::DbManager;
pub use record_store::SqliteRecordStore;
