//! SQLite connection pool
//!
//! r2d2-based pooling over `r2d2_sqlite`. Every connection gets the pragmas
//! from [`SqlitePoolConfig`] applied once, when the pool opens it.

use std::path::Path;
use std::time::Instant;

use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use tracing::{debug, info, instrument, warn};

use super::config::SqlitePoolConfig;
use super::pragmas::apply_connection_pragmas;
use crate::storage::error::{StorageError, StorageResult};

/// Connection checked out of a [`SqlitePool`]; returned to the pool on drop.
pub type SqliteConnection = PooledConnection<SqliteConnectionManager>;

/// Snapshot of pool occupancy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolStatus {
    pub connections: u32,
    pub idle_connections: u32,
    pub max_size: u32,
}

/// SQLite connection pool
#[derive(Debug)]
pub struct SqlitePool {
    pool: Pool<SqliteConnectionManager>,
    config: SqlitePoolConfig,
}

impl SqlitePool {
    /// Create a new pool for the database file at `path`.
    ///
    /// A test connection is checked out before returning so that an
    /// unreadable path fails here rather than on first use.
    #[instrument(skip(config), fields(pool_size = config.max_size))]
    pub fn new(path: &Path, config: SqlitePoolConfig) -> StorageResult<Self> {
        info!("Creating SQLite connection pool");

        if config.max_size == 0 {
            return Err(StorageError::InvalidConfig("pool size must be at least 1".into()));
        }

        let pool_config = config.clone();
        let manager = SqliteConnectionManager::file(path).with_init(move |conn| {
            apply_connection_pragmas(conn, &pool_config)
                .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))
        });

        let pool = Pool::builder()
            .max_size(config.max_size)
            .connection_timeout(config.connection_timeout)
            .build(manager)
            .map_err(|e| {
                warn!(error = %e, "sqlite pool could not be built");
                StorageError::Connection(format!("Failed to create pool: {e}"))
            })?;

        {
            let conn = pool.get()?;
            conn.query_row("SELECT 1", [], |row| row.get::<_, i32>(0))?;
            debug!("Test connection verified");
        }

        info!("SQLite pool created with {} connections", config.max_size);
        Ok(Self { pool, config })
    }

    /// Check a connection out of the pool.
    pub fn get_connection(&self) -> StorageResult<SqliteConnection> {
        let started = Instant::now();

        match self.pool.get() {
            Ok(conn) => {
                debug!(duration_ms = started.elapsed().as_millis() as u64, "Connection acquired");
                Ok(conn)
            }
            Err(e) => {
                if e.to_string().to_lowercase().contains("timed out") {
                    warn!(timeout = ?self.config.connection_timeout, "timed out waiting for a pooled connection");
                    Err(StorageError::Timeout(self.config.connection_timeout.as_secs()))
                } else {
                    warn!(error = %e, "pooled connection unavailable");
                    Err(StorageError::Connection(format!("Failed to get connection: {e}")))
                }
            }
        }
    }

    /// Current occupancy of the pool.
    pub fn status(&self) -> PoolStatus {
        let r2d2::State { connections, idle_connections, .. } = self.pool.state();
        PoolStatus {
            connections,
            idle_connections,
            max_size: self.config.max_size,
        }
    }
}
