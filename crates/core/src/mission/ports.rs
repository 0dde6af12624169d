//! Port interfaces for mission lifecycle collaborators
//!
//! The browser owns tabs and content-script injection; these traits keep
//! the lifecycle independent of how either is reached.

use async_trait::async_trait;
use delegate_domain::{Result, RunAt};

/// Source of the URL of the tab that issued the current request.
#[async_trait]
pub trait ActiveTab: Send + Sync {
    /// URL of the active tab, `None` when no tab is focused.
    async fn active_url(&self) -> Result<Option<String>>;
}

/// A content script to inject into pages matching `matches`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptRegistration {
    pub id: String,
    pub js: Vec<String>,
    /// Match patterns such as `https://example.com/*`.
    pub matches: Vec<String>,
    pub run_at: RunAt,
}

/// Registration of the click-tracking content script.
#[async_trait]
pub trait ScriptRegistry: Send + Sync {
    /// Register `registration`, replacing any script with the same id.
    async fn register(&self, registration: ScriptRegistration) -> Result<()>;

    /// Remove the script with `script_id`. Unknown ids are ignored.
    async fn unregister(&self, script_id: &str) -> Result<()>;

    /// Whether a page at `url` currently gets the tracker injected.
    fn is_tracked(&self, url: &str) -> bool;
}
