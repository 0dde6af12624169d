//! SQLite-backed record store.
//!
//! Implements the core `RecordStore` port on top of the pool owned by
//! `DbManager`. Every call runs on the blocking thread pool inside its own
//! transaction.

use std::sync::Arc;

use async_trait::async_trait;
use delegate_core::{Collection, RecordStore};
use delegate_domain::{DelegateError, RecordId, Result};
use rusqlite::{params, Connection, OptionalExtension, Transaction, TransactionBehavior};
use serde_json::Value;
use tokio::task;
use tracing::debug;

use super::manager::DbManager;
use crate::errors::InfraError;

/// `RecordStore` over the tables created by `schema.sql`.
pub struct SqliteRecordStore {
    db: Arc<DbManager>,
}

impl SqliteRecordStore {
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }

    async fn run<T, F>(&self, op: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut Connection) -> std::result::Result<T, InfraError> + Send + 'static,
    {
        let db = Arc::clone(&self.db);
        task::spawn_blocking(move || -> Result<T> {
            let mut conn = db.get_connection()?;
            op(&mut conn).map_err(DelegateError::from)
        })
        .await
        .map_err(|err| DelegateError::from(InfraError::from(err)))?
    }
}

/// Take the write lock up front so concurrent writers wait on the busy
/// timeout instead of failing on a lock upgrade.
fn write_transaction(conn: &mut Connection) -> rusqlite::Result<Transaction<'_>> {
    conn.transaction_with_behavior(TransactionBehavior::Immediate)
}

fn table(collection: Collection) -> &'static str {
    match collection {
        Collection::UrlPermissions => "permissions",
        Collection::Activities => "activities",
        Collection::Missions => "missions",
    }
}

/// Body without the `id` field plus the values of the indexed columns.
fn split_document(
    collection: Collection,
    mut document: Value,
) -> std::result::Result<(String, Vec<String>), InfraError> {
    let Value::Object(map) = &mut document else {
        return Err(DelegateError::Validation(format!("{collection} record must be an object")).into());
    };
    map.remove("id");

    let mut keys = Vec::with_capacity(collection.indexes().len());
    for index in collection.indexes() {
        let key = map.get(*index).and_then(Value::as_str).ok_or_else(|| {
            DelegateError::Validation(format!("{collection} record needs a string {index}"))
        })?;
        keys.push(key.to_string());
    }
    Ok((serde_json::to_string(&document)?, keys))
}

fn join_document(id: RecordId, body: &str) -> std::result::Result<Value, InfraError> {
    let mut document: Value = serde_json::from_str(body)?;
    if let Value::Object(map) = &mut document {
        map.insert("id".into(), Value::from(id));
    }
    Ok(document)
}

fn read_rows(
    conn: &Connection,
    sql: &str,
    params: impl rusqlite::Params,
) -> std::result::Result<Vec<Value>, InfraError> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params, |row| Ok((row.get::<_, RecordId>(0)?, row.get::<_, String>(1)?)))?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    rows.iter().map(|(id, body)| join_document(*id, body)).collect()
}

fn insert(
    conn: &Connection,
    collection: Collection,
    document: Value,
) -> std::result::Result<RecordId, InfraError> {
    let (body, keys) = split_document(collection, document)?;
    let name = table(collection);
    match collection.indexes() {
        [] => conn.execute(&format!("INSERT INTO {name} (body) VALUES (?1)"), params![body])?,
        [index] => conn.execute(
            &format!("INSERT INTO {name} (body, {index}) VALUES (?1, ?2)"),
            params![body, keys[0]],
        )?,
        _ => unreachable_index_layout(collection)?,
    };
    Ok(conn.last_insert_rowid())
}

fn replace(
    conn: &Connection,
    collection: Collection,
    id: RecordId,
    document: Value,
) -> std::result::Result<(), InfraError> {
    let (body, keys) = split_document(collection, document)?;
    let name = table(collection);
    let changed = match collection.indexes() {
        [] => conn.execute(&format!("UPDATE {name} SET body = ?1 WHERE id = ?2"), params![body, id])?,
        [index] => conn.execute(
            &format!("UPDATE {name} SET body = ?1, {index} = ?2 WHERE id = ?3"),
            params![body, keys[0], id],
        )?,
        _ => unreachable_index_layout(collection)?,
    };
    if changed == 0 {
        return Err(DelegateError::NotFound(format!("{collection} record {id}")).into());
    }
    Ok(())
}

fn unreachable_index_layout(collection: Collection) -> std::result::Result<usize, InfraError> {
    Err(DelegateError::Internal(format!("no table layout for the indexes of {collection}")).into())
}

#[async_trait]
impl RecordStore for SqliteRecordStore {
    async fn get_all(&self, collection: Collection) -> Result<Vec<Value>> {
        self.run(move |conn| {
            read_rows(conn, &format!("SELECT id, body FROM {} ORDER BY id", table(collection)), [])
        })
        .await
    }

    async fn find(&self, collection: Collection, id: RecordId) -> Result<Option<Value>> {
        self.run(move |conn| {
            let body: Option<String> = conn
                .query_row(
                    &format!("SELECT body FROM {} WHERE id = ?1", table(collection)),
                    params![id],
                    |row| row.get(0),
                )
                .optional()?;
            body.map(|body| join_document(id, &body)).transpose()
        })
        .await
    }

    async fn find_by_index(
        &self,
        collection: Collection,
        index: &str,
        key: &str,
    ) -> Result<Option<Value>> {
        collection.require_index(index)?;
        let (index, key) = (index.to_string(), key.to_string());
        self.run(move |conn| {
            let sql = format!("SELECT id, body FROM {} WHERE {index} = ?1", table(collection));
            Ok(read_rows(conn, &sql, params![key])?.into_iter().next())
        })
        .await
    }

    async fn add(&self, collection: Collection, document: Value) -> Result<RecordId> {
        let id = self
            .run(move |conn| {
                let tx = write_transaction(conn)?;
                let id = insert(&tx, collection, document)?;
                tx.commit()?;
                Ok(id)
            })
            .await?;
        debug!(%collection, id, "record added");
        Ok(id)
    }

    async fn update(&self, collection: Collection, id: RecordId, document: Value) -> Result<()> {
        self.run(move |conn| {
            let tx = write_transaction(conn)?;
            replace(&tx, collection, id, document)?;
            tx.commit()?;
            Ok(())
        })
        .await
    }

    async fn remove(&self, collection: Collection, id: RecordId) -> Result<RecordId> {
        self.run(move |conn| {
            let tx = write_transaction(conn)?;
            tx.execute(&format!("DELETE FROM {} WHERE id = ?1", table(collection)), params![id])?;
            tx.commit()?;
            Ok(id)
        })
        .await
    }

    async fn remove_all(&self, collection: Collection) -> Result<()> {
        self.run(move |conn| {
            let tx = write_transaction(conn)?;
            let removed = tx.execute(&format!("DELETE FROM {}", table(collection)), [])?;
            tx.commit()?;
            debug!(%collection, removed, "collection cleared");
            Ok(())
        })
        .await
    }

    async fn replace_and_clear(
        &self,
        collection: Collection,
        id: RecordId,
        document: Value,
        cleared: Collection,
    ) -> Result<()> {
        self.run(move |conn| {
            let tx = write_transaction(conn)?;
            replace(&tx, collection, id, document)?;
            let removed = tx.execute(&format!("DELETE FROM {}", table(cleared)), [])?;
            tx.commit()?;
            debug!(%collection, id, %cleared, removed, "record replaced and collection cleared");
            Ok(())
        })
        .await
    }
}
