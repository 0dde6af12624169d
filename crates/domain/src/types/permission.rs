//! URL permission records

use serde::{Deserialize, Serialize};

use super::RecordId;

/// Authorization to track clicks on one hostname.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlPermission {
    pub id: RecordId,
    pub url: String,
}

/// Permission that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUrlPermission {
    pub url: String,
}
