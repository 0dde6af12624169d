//! Active-tab tracker fed by `tabUpdated` messages.

use async_trait::async_trait;
use delegate_core::ActiveTab;
use delegate_domain::Result;
use parking_lot::RwLock;
use tracing::debug;

/// Last URL reported for the focused tab.
#[derive(Debug, Default)]
pub struct TabTracker {
    url: RwLock<Option<String>>,
}

impl TabTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&self, url: impl Into<String>) {
        let url = url.into();
        debug!(url = %url, "active tab updated");
        *self.url.write() = Some(url);
    }

    pub fn clear(&self) {
        *self.url.write() = None;
    }
}

#[async_trait]
impl ActiveTab for TabTracker {
    async fn active_url(&self) -> Result<Option<String>> {
        Ok(self.url.read().clone())
    }
}
