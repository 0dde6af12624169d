//! Permission registry service

use std::sync::Arc;

use delegate_domain::{DelegateError, NewUrlPermission, RecordId, Result, UrlPermission};
use tracing::{info, warn};
use url::Url;

use crate::events::{Broadcaster, Notification};
use crate::store::TypedStore;

pub struct PermissionRegistry {
    store: TypedStore,
    broadcaster: Arc<dyn Broadcaster>,
}

impl PermissionRegistry {
    pub fn new(store: TypedStore, broadcaster: Arc<dyn Broadcaster>) -> Self {
        Self { store, broadcaster }
    }

    /// Permit tracking on the host of `url`. Accepts a bare hostname or a
    /// full URL. Fails with `Conflict` if the host is already permitted.
    pub async fn add(&self, url: &str) -> Result<RecordId> {
        let host = normalize_host(url)?;
        let id = self.store.add::<UrlPermission>(&NewUrlPermission { url: host.clone() }).await?;
        info!(permission_id = id, host = %host, "url permission added");
        Ok(id)
    }

    pub async fn list(&self) -> Result<Vec<UrlPermission>> {
        self.store.get_all::<UrlPermission>().await
    }

    /// Permission for the host of `url`, if any.
    pub async fn find(&self, url: &str) -> Result<Option<UrlPermission>> {
        let host = normalize_host(url)?;
        self.store.find_by_index::<UrlPermission>("url", &host).await
    }

    pub async fn remove(&self, id: RecordId) -> Result<RecordId> {
        let removed = self.store.remove::<UrlPermission>(id).await?;
        if let Err(err) = self.broadcaster.publish(Notification::UrlPermissionRemoved { id }) {
            warn!(permission_id = id, error = %err, "permission removal broadcast failed");
        }
        Ok(removed)
    }
}

/// Reduce user input to a lowercase hostname. Bare input is read as the
/// authority of an `https` URL, so ports are dropped either way.
pub fn normalize_host(input: &str) -> Result<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(DelegateError::Validation("url must not be empty".into()));
    }
    let bare = !trimmed.contains("://");
    let parsed = if bare {
        Url::parse(&format!("https://{trimmed}"))
    } else {
        Url::parse(trimmed)
    }
    .map_err(|err| DelegateError::Validation(format!("invalid url {trimmed:?}: {err}")))?;

    if bare && (parsed.path() != "/" || parsed.query().is_some() || parsed.fragment().is_some()) {
        return Err(DelegateError::Validation(format!("{trimmed:?} is not a hostname")));
    }
    parsed
        .host_str()
        .filter(|host| !host.is_empty())
        .map(str::to_ascii_lowercase)
        .ok_or_else(|| DelegateError::Validation(format!("url {trimmed:?} has no host")))
}
