//! Typed facade over [`RecordStore`]
//!
//! Services work with domain types; the store only sees JSON documents.

use std::sync::Arc;

use delegate_domain::{
    Activity, DelegateError, Mission, NewActivity, NewMission, NewUrlPermission, RecordId,
    Result, UrlPermission,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use super::ports::{Collection, RecordStore};

/// A domain type stored in one collection.
pub trait Record: Serialize + DeserializeOwned + Send + Sync {
    const COLLECTION: Collection;

    /// Payload accepted by `add`, before an id exists.
    type Draft: Serialize + Send + Sync;

    fn id(&self) -> RecordId;
}

impl Record for UrlPermission {
    const COLLECTION: Collection = Collection::UrlPermissions;
    type Draft = NewUrlPermission;

    fn id(&self) -> RecordId {
        self.id
    }
}

impl Record for Activity {
    const COLLECTION: Collection = Collection::Activities;
    type Draft = NewActivity;

    fn id(&self) -> RecordId {
        self.id
    }
}

impl Record for Mission {
    const COLLECTION: Collection = Collection::Missions;
    type Draft = NewMission;

    fn id(&self) -> RecordId {
        self.id
    }
}

/// Cloneable handle that (de)serializes records for a [`RecordStore`].
#[derive(Clone)]
pub struct TypedStore {
    inner: Arc<dyn RecordStore>,
}

impl TypedStore {
    pub fn new(inner: Arc<dyn RecordStore>) -> Self {
        Self { inner }
    }

    pub async fn get_all<T: Record>(&self) -> Result<Vec<T>> {
        self.inner.get_all(T::COLLECTION).await?.into_iter().map(decode).collect()
    }

    pub async fn find<T: Record>(&self, id: RecordId) -> Result<Option<T>> {
        self.inner.find(T::COLLECTION, id).await?.map(decode).transpose()
    }

    pub async fn find_by_index<T: Record>(&self, index: &str, key: &str) -> Result<Option<T>> {
        T::COLLECTION.require_index(index)?;
        self.inner.find_by_index(T::COLLECTION, index, key).await?.map(decode).transpose()
    }

    pub async fn add<T: Record>(&self, draft: &T::Draft) -> Result<RecordId> {
        self.inner.add(T::COLLECTION, serde_json::to_value(draft)?).await
    }

    pub async fn update<T: Record>(&self, record: &T) -> Result<()> {
        self.inner.update(T::COLLECTION, record.id(), serde_json::to_value(record)?).await
    }

    pub async fn remove<T: Record>(&self, id: RecordId) -> Result<RecordId> {
        self.inner.remove(T::COLLECTION, id).await
    }

    pub async fn remove_all<T: Record>(&self) -> Result<()> {
        self.inner.remove_all(T::COLLECTION).await
    }

    /// Store `record` and empty the collection of `C` atomically.
    pub async fn replace_and_clear<T: Record, C: Record>(&self, record: &T) -> Result<()> {
        self.inner
            .replace_and_clear(T::COLLECTION, record.id(), serde_json::to_value(record)?, C::COLLECTION)
            .await
    }
}

fn decode<T: Record>(document: Value) -> Result<T> {
    serde_json::from_value(document).map_err(|err| {
        DelegateError::Storage(format!("corrupt {} document: {err}", T::COLLECTION))
    })
}
