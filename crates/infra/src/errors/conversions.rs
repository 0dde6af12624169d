//! Conversions from external infrastructure errors into domain errors.

use delegate_common::StorageError;
use delegate_domain::DelegateError;
use rusqlite::Error as SqlError;
use tokio::task::JoinError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub DelegateError);

impl From<InfraError> for DelegateError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<DelegateError> for InfraError {
    fn from(value: DelegateError) -> Self {
        InfraError(value)
    }
}

trait IntoDelegateError {
    fn into_delegate(self) -> DelegateError;
}

/* -------------------------------------------------------------------------- */
/* rusqlite::Error → DelegateError */
/* -------------------------------------------------------------------------- */

impl IntoDelegateError for SqlError {
    fn into_delegate(self) -> DelegateError {
        use rusqlite::ffi::ErrorCode;
        use rusqlite::Error as RE;

        match self {
            RE::SqliteFailure(err, maybe_message) => {
                let message = maybe_message.unwrap_or_default();
                match (err.code, err.extended_code) {
                    (ErrorCode::DatabaseBusy, _) => DelegateError::Storage("database is busy".into()),
                    (ErrorCode::DatabaseLocked, _) => {
                        DelegateError::Storage("database is locked".into())
                    }
                    (ErrorCode::ConstraintViolation, rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE) => {
                        DelegateError::Conflict(format!("unique constraint violation: {message}"))
                    }
                    _ => DelegateError::Storage(format!(
                        "sqlite failure {:?} (code {}): {}",
                        err.code, err.extended_code, message
                    )),
                }
            }
            RE::QueryReturnedNoRows => DelegateError::NotFound("no rows returned by query".into()),
            RE::FromSqlConversionFailure(_, _, cause) => {
                DelegateError::Storage(format!("failed to convert sqlite value: {cause}"))
            }
            RE::InvalidColumnType(_, _, ty) => {
                DelegateError::Storage(format!("invalid column type: {ty}"))
            }
            RE::InvalidPath(path) => DelegateError::Storage(format!(
                "invalid database path: {}",
                path.to_string_lossy()
            )),
            other => DelegateError::Storage(other.to_string()),
        }
    }
}

impl From<SqlError> for InfraError {
    fn from(value: SqlError) -> Self {
        InfraError(value.into_delegate())
    }
}

/* -------------------------------------------------------------------------- */
/* StorageError → DelegateError */
/* -------------------------------------------------------------------------- */

impl IntoDelegateError for StorageError {
    fn into_delegate(self) -> DelegateError {
        match self {
            StorageError::Rusqlite(err) => err.into_delegate(),
            StorageError::InvalidConfig(message) => DelegateError::Config(message),
            StorageError::Timeout(secs) => {
                DelegateError::Storage(format!("timed out after {secs}s waiting for a connection"))
            }
            other if other.is_transient() => {
                DelegateError::Storage(format!("storage temporarily unavailable: {other}"))
            }
            other => DelegateError::Storage(other.to_string()),
        }
    }
}

impl From<StorageError> for InfraError {
    fn from(value: StorageError) -> Self {
        InfraError(value.into_delegate())
    }
}

/* -------------------------------------------------------------------------- */
/* serde_json / tokio join errors */
/* -------------------------------------------------------------------------- */

impl From<serde_json::Error> for InfraError {
    fn from(value: serde_json::Error) -> Self {
        InfraError(DelegateError::Storage(format!("stored document is not valid JSON: {value}")))
    }
}

impl From<JoinError> for InfraError {
    fn from(value: JoinError) -> Self {
        InfraError(DelegateError::Internal(format!("blocking storage task failed: {value}")))
    }
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;

    use super::*;

    fn unique_violation() -> SqlError {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE t (name TEXT UNIQUE); INSERT INTO t VALUES ('a');")
            .unwrap();
        conn.execute("INSERT INTO t VALUES ('a')", []).unwrap_err()
    }

    #[test]
    fn unique_violations_become_conflicts() {
        let err: DelegateError = InfraError::from(unique_violation()).into();
        assert!(matches!(err, DelegateError::Conflict(_)), "{err:?}");

        let err: DelegateError = InfraError::from(StorageError::from(unique_violation())).into();
        assert!(matches!(err, DelegateError::Conflict(_)), "{err:?}");
    }

    #[test]
    fn missing_rows_become_not_found() {
        let err: DelegateError = InfraError::from(SqlError::QueryReturnedNoRows).into();
        assert_eq!(err.label(), "not_found");
    }

    #[test]
    fn pool_errors_become_storage_or_config() {
        let err: DelegateError = InfraError::from(StorageError::Timeout(5)).into();
        assert_eq!(err.label(), "storage");
        let err: DelegateError = InfraError::from(StorageError::InvalidConfig("x".into())).into();
        assert_eq!(err.label(), "config");
        let err: DelegateError = InfraError::from(StorageError::Connection("refused".into())).into();
        assert!(err.to_string().contains("temporarily unavailable"), "{err}");
    }
}
