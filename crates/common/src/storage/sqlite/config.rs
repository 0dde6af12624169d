//! Pool sizing and per-connection settings

use std::time::Duration;

const DEFAULT_MAX_SIZE: u32 = 4;
const DEFAULT_CHECKOUT_TIMEOUT: Duration = Duration::from_secs(5);
const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Settings for [`SqlitePool`](super::SqlitePool).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlitePoolConfig {
    /// Upper bound on open connections.
    pub max_size: u32,
    /// How long a checkout waits for a free connection.
    pub connection_timeout: Duration,
    /// How long a statement waits on a locked database before failing.
    pub busy_timeout: Duration,
    /// Write-ahead logging, so readers never block the single writer.
    pub enable_wal: bool,
}

impl Default for SqlitePoolConfig {
    fn default() -> Self {
        Self {
            max_size: DEFAULT_MAX_SIZE,
            connection_timeout: DEFAULT_CHECKOUT_TIMEOUT,
            busy_timeout: DEFAULT_BUSY_TIMEOUT,
            enable_wal: true,
        }
    }
}

impl SqlitePoolConfig {
    pub fn with_max_size(mut self, max_size: u32) -> Self {
        self.max_size = max_size;
        self
    }

    pub fn with_busy_timeout(mut self, busy_timeout: Duration) -> Self {
        self.busy_timeout = busy_timeout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_favour_wal_and_a_small_pool() {
        let config = SqlitePoolConfig::default();
        assert_eq!(config.max_size, 4);
        assert_eq!(config.busy_timeout, Duration::from_secs(5));
        assert!(config.enable_wal);
    }

    #[test]
    fn builders_override_single_fields() {
        let config = SqlitePoolConfig::default()
            .with_max_size(1)
            .with_busy_timeout(Duration::from_millis(50));
        assert_eq!(config.max_size, 1);
        assert_eq!(config.busy_timeout, Duration::from_millis(50));
        assert_eq!(config.connection_timeout, DEFAULT_CHECKOUT_TIMEOUT);
    }
}
