//! Port interface for the persistent record store
//!
//! Records are JSON documents grouped in named collections. The store owns
//! primary keys: every document handed back carries its `id` field.

use async_trait::async_trait;
use delegate_domain::{DelegateError, RecordId, Result};
use serde_json::Value;

/// The fixed set of collections the extension persists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    UrlPermissions,
    Activities,
    Missions,
}

delegate_domain::impl_domain_status_conversions!(Collection {
    UrlPermissions => "urlpermissions",
    Activities => "activities",
    Missions => "missions",
});

impl Collection {
    pub const ALL: [Collection; 3] =
        [Collection::UrlPermissions, Collection::Activities, Collection::Missions];

    /// Unique secondary indexes declared on this collection.
    pub fn indexes(self) -> &'static [&'static str] {
        match self {
            Self::UrlPermissions => &["url"],
            Self::Activities => &[],
            Self::Missions => &["name"],
        }
    }

    pub fn has_index(self, index: &str) -> bool {
        self.indexes().contains(&index)
    }

    /// Reject lookups on indexes the collection does not declare.
    pub fn require_index(self, index: &str) -> Result<()> {
        if self.has_index(index) {
            Ok(())
        } else {
            Err(DelegateError::Validation(format!("collection {self} has no index named {index}")))
        }
    }
}

/// Document-level persistence for all collections.
///
/// Indexed keys are unique: `add` or `update` producing a duplicate key
/// fails with [`DelegateError::Conflict`].
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Every document in the collection, in ascending id order.
    async fn get_all(&self, collection: Collection) -> Result<Vec<Value>>;

    async fn find(&self, collection: Collection, id: RecordId) -> Result<Option<Value>>;

    /// Exact-match lookup on a declared unique index.
    async fn find_by_index(
        &self,
        collection: Collection,
        index: &str,
        key: &str,
    ) -> Result<Option<Value>>;

    /// Insert a document and return its freshly assigned id.
    ///
    /// Any `id` field in `document` is ignored.
    async fn add(&self, collection: Collection, document: Value) -> Result<RecordId>;

    /// Replace the stored document with primary key `id`.
    ///
    /// Fails with [`DelegateError::NotFound`] if nothing is stored under `id`.
    async fn update(&self, collection: Collection, id: RecordId, document: Value) -> Result<()>;

    /// Delete by primary key. Deleting a missing id succeeds.
    async fn remove(&self, collection: Collection, id: RecordId) -> Result<RecordId>;

    async fn remove_all(&self, collection: Collection) -> Result<()>;

    /// Replace one document and empty another collection in a single
    /// transaction. Either both effects are visible or neither is.
    async fn replace_and_clear(
        &self,
        collection: Collection,
        id: RecordId,
        document: Value,
        cleared: Collection,
    ) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declared_indexes() {
        assert!(Collection::UrlPermissions.has_index("url"));
        assert!(Collection::Missions.has_index("name"));
        assert!(!Collection::Activities.has_index("url"));
    }

    #[test]
    fn undeclared_index_is_a_validation_error() {
        let err = Collection::Missions.require_index("url").unwrap_err();
        assert_eq!(err.label(), "validation");
    }

    #[test]
    fn collection_names_round_trip() {
        for collection in Collection::ALL {
            assert_eq!(collection.to_string().parse::<Collection>().unwrap(), collection);
        }
    }
}
