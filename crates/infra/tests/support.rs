#![allow(dead_code)]

use std::sync::Arc;

use delegate_infra::database::{DbManager, SqliteRecordStore};
use tempfile::TempDir;

/// Migrated SQLite file in a temp dir, removed when dropped.
pub struct TestDatabase {
    pub manager: Arc<DbManager>,
    pub store: Arc<SqliteRecordStore>,
    _temp_dir: TempDir,
}

impl TestDatabase {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("temp dir should be created");
        let db_path = temp_dir.path().join("records.db");

        let manager = Arc::new(DbManager::new(&db_path, 4, 2_000).expect("db manager should be created"));
        manager.run_migrations().expect("migrated");
        let store = Arc::new(SqliteRecordStore::new(Arc::clone(&manager)));

        Self { manager, store, _temp_dir: temp_dir }
    }

    /// Run raw SQL, bypassing the record store.
    pub fn raw_sql(&self, sql: &str) {
        let conn = self.manager.get_connection().expect("pooled connection");
        conn.execute_batch(sql).expect("raw sql");
    }

    pub fn count(&self, table: &str) -> i64 {
        let conn = self.manager.get_connection().expect("connection");
        conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))
            .expect("count query")
    }
}
