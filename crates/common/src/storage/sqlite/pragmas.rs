//! Per-connection pragmas
//!
//! Applied by the pool to every connection it opens, before first use.

use rusqlite::Connection;

use super::config::SqlitePoolConfig;
use crate::storage::error::{StorageError, StorageResult};

/// WAL pages written before an automatic checkpoint.
const WAL_AUTOCHECKPOINT_PAGES: u32 = 1000;

/// Pragma statements implied by `config`, in execution order.
fn pragma_statements(config: &SqlitePoolConfig) -> Vec<String> {
    let mut statements = vec!["PRAGMA foreign_keys = ON".to_string()];
    if config.enable_wal {
        statements.push("PRAGMA journal_mode = WAL".to_string());
        statements.push(format!("PRAGMA wal_autocheckpoint = {WAL_AUTOCHECKPOINT_PAGES}"));
    }
    statements.push("PRAGMA synchronous = NORMAL".to_string());
    statements
}

/// Configure `conn` according to `config`.
pub fn apply_connection_pragmas(conn: &Connection, config: &SqlitePoolConfig) -> StorageResult<()> {
    let batch = pragma_statements(config).join(";\n");
    conn.execute_batch(&batch)
        .map_err(|e| StorageError::Query(format!("Failed to apply pragmas: {e}")))?;

    conn.busy_timeout(config.busy_timeout)
        .map_err(|e| StorageError::Query(format!("Failed to set busy timeout: {e}")))
}
