//! Lazily opened store handle.
//!
//! The database is opened and migrated on first use, once, no matter how
//! many requests race to use it. Services hold this handle as their
//! `RecordStore` instead of a process-wide connection.

use std::sync::Arc;

use async_trait::async_trait;
use delegate_core::{Collection, RecordStore};
use delegate_domain::{DatabaseConfig, DelegateError, RecordId, Result};
use serde_json::Value;
use tokio::sync::OnceCell;
use tokio::task;
use tracing::info;

use super::manager::DbManager;
use super::record_store::SqliteRecordStore;
use crate::errors::InfraError;

/// Shared, lazily initialised SQLite store.
#[derive(Clone)]
pub struct Database {
    config: DatabaseConfig,
    cell: Arc<OnceCell<Arc<SqliteRecordStore>>>,
}

impl Database {
    pub fn new(config: DatabaseConfig) -> Self {
        Self { config, cell: Arc::new(OnceCell::new()) }
    }

    /// The record store, opening and migrating the database on first call.
    ///
    /// A failed open is not cached; the next call tries again.
    pub async fn store(&self) -> Result<Arc<SqliteRecordStore>> {
        let store = self.cell.get_or_try_init(|| self.open()).await?;
        Ok(Arc::clone(store))
    }

    async fn open(&self) -> Result<Arc<SqliteRecordStore>> {
        let config = self.config.clone();
        let manager = task::spawn_blocking(move || -> Result<DbManager> {
            let manager = DbManager::from_config(&config)?;
            manager.run_migrations()?;
            manager.health_check()?;
            Ok(manager)
        })
        .await
        .map_err(|err| DelegateError::from(InfraError::from(err)))??;

        info!(path = %manager.path().display(), "database opened");
        Ok(Arc::new(SqliteRecordStore::new(Arc::new(manager))))
    }

    pub fn is_open(&self) -> bool {
        self.cell.initialized()
    }
}

#[async_trait]
impl RecordStore for Database {
    async fn get_all(&self, collection: Collection) -> Result<Vec<Value>> {
        self.store().await?.get_all(collection).await
    }

    async fn find(&self, collection: Collection, id: RecordId) -> Result<Option<Value>> {
        self.store().await?.find(collection, id).await
    }

    async fn find_by_index(
        &self,
        collection: Collection,
        index: &str,
        key: &str,
    ) -> Result<Option<Value>> {
        self.store().await?.find_by_index(collection, index, key).await
    }

    async fn add(&self, collection: Collection, document: Value) -> Result<RecordId> {
        self.store().await?.add(collection, document).await
    }

    async fn update(&self, collection: Collection, id: RecordId, document: Value) -> Result<()> {
        self.store().await?.update(collection, id, document).await
    }

    async fn remove(&self, collection: Collection, id: RecordId) -> Result<RecordId> {
        self.store().await?.remove(collection, id).await
    }

    async fn remove_all(&self, collection: Collection) -> Result<()> {
        self.store().await?.remove_all(collection).await
    }

    async fn replace_and_clear(
        &self,
        collection: Collection,
        id: RecordId,
        document: Value,
        cleared: Collection,
    ) -> Result<()> {
        self.store().await?.replace_and_clear(collection, id, document, cleared).await
    }
}
