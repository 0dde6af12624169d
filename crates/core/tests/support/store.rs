//! In-memory `RecordStore`

use std::collections::BTreeMap;

use async_trait::async_trait;
use delegate_core::{Collection, RecordStore};
use delegate_domain::{DelegateError, RecordId, Result};
use parking_lot::Mutex;
use serde_json::Value;

#[derive(Default)]
struct Table {
    next_id: RecordId,
    rows: BTreeMap<RecordId, Value>,
}

/// Mirrors the SQLite adapter: auto-increment ids, unique indexes,
/// `NotFound` on updating a missing id.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<BTreeMap<String, Table>>,
    fail_writes: Mutex<bool>,
}

impl MemoryStore {
    /// Make every subsequent write fail with a storage error.
    pub fn fail_writes(&self, fail: bool) {
        *self.fail_writes.lock() = fail;
    }

    pub fn len(&self, collection: Collection) -> usize {
        self.tables.lock().get(&collection.to_string()).map_or(0, |table| table.rows.len())
    }

    fn check_writable(&self) -> Result<()> {
        if *self.fail_writes.lock() {
            Err(DelegateError::Storage("injected write failure".into()))
        } else {
            Ok(())
        }
    }
}

fn with_id(mut document: Value, id: RecordId) -> Value {
    if let Value::Object(map) = &mut document {
        map.insert("id".into(), Value::from(id));
    }
    document
}

fn check_unique(
    collection: Collection,
    table: &Table,
    id: Option<RecordId>,
    document: &Value,
) -> Result<()> {
    for index in collection.indexes() {
        let key = &document[*index];
        let clash = table
            .rows
            .iter()
            .any(|(row_id, row)| Some(*row_id) != id && !key.is_null() && row[*index] == *key);
        if clash {
            return Err(DelegateError::Conflict(format!("{collection}.{index} must be unique")));
        }
    }
    Ok(())
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn get_all(&self, collection: Collection) -> Result<Vec<Value>> {
        let tables = self.tables.lock();
        Ok(tables
            .get(&collection.to_string())
            .map(|table| table.rows.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn find(&self, collection: Collection, id: RecordId) -> Result<Option<Value>> {
        let tables = self.tables.lock();
        Ok(tables.get(&collection.to_string()).and_then(|table| table.rows.get(&id).cloned()))
    }

    async fn find_by_index(
        &self,
        collection: Collection,
        index: &str,
        key: &str,
    ) -> Result<Option<Value>> {
        collection.require_index(index)?;
        let tables = self.tables.lock();
        Ok(tables.get(&collection.to_string()).and_then(|table| {
            table.rows.values().find(|row| row[index].as_str() == Some(key)).cloned()
        }))
    }

    async fn add(&self, collection: Collection, document: Value) -> Result<RecordId> {
        self.check_writable()?;
        let mut tables = self.tables.lock();
        let table = tables.entry(collection.to_string()).or_default();
        check_unique(collection, table, None, &document)?;
        table.next_id += 1;
        let id = table.next_id;
        table.rows.insert(id, with_id(document, id));
        Ok(id)
    }

    async fn update(&self, collection: Collection, id: RecordId, document: Value) -> Result<()> {
        self.check_writable()?;
        let mut tables = self.tables.lock();
        let table = tables.entry(collection.to_string()).or_default();
        if !table.rows.contains_key(&id) {
            return Err(DelegateError::NotFound(format!("{collection} record {id}")));
        }
        check_unique(collection, table, Some(id), &document)?;
        table.rows.insert(id, with_id(document, id));
        Ok(())
    }

    async fn remove(&self, collection: Collection, id: RecordId) -> Result<RecordId> {
        self.check_writable()?;
        if let Some(table) = self.tables.lock().get_mut(&collection.to_string()) {
            table.rows.remove(&id);
        }
        Ok(id)
    }

    async fn remove_all(&self, collection: Collection) -> Result<()> {
        self.check_writable()?;
        if let Some(table) = self.tables.lock().get_mut(&collection.to_string()) {
            table.rows.clear();
        }
        Ok(())
    }

    async fn replace_and_clear(
        &self,
        collection: Collection,
        id: RecordId,
        document: Value,
        cleared: Collection,
    ) -> Result<()> {
        self.check_writable()?;
        let mut tables = self.tables.lock();
        let table = tables.entry(collection.to_string()).or_default();
        if !table.rows.contains_key(&id) {
            return Err(DelegateError::NotFound(format!("{collection} record {id}")));
        }
        table.rows.insert(id, with_id(document, id));
        if let Some(table) = tables.get_mut(&cleared.to_string()) {
            table.rows.clear();
        }
        Ok(())
    }
}
