//! In-process content-script registry.
//!
//! Keeps the registrations the browser would hold and answers whether a page
//! gets the tracker injected.

use std::collections::BTreeMap;

use async_trait::async_trait;
use delegate_core::{MatchPattern, ScriptRegistration, ScriptRegistry};
use delegate_domain::Result;
use parking_lot::RwLock;
use tracing::{debug, info, warn};

#[derive(Debug, Default)]
pub struct MemoryScriptRegistry {
    scripts: RwLock<BTreeMap<String, (ScriptRegistration, Vec<MatchPattern>)>>,
}

impl MemoryScriptRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, script_id: &str) -> Option<ScriptRegistration> {
        self.scripts.read().get(script_id).map(|(registration, _)| registration.clone())
    }

    pub fn registered_ids(&self) -> Vec<String> {
        self.scripts.read().keys().cloned().collect()
    }
}

#[async_trait]
impl ScriptRegistry for MemoryScriptRegistry {
    async fn register(&self, registration: ScriptRegistration) -> Result<()> {
        let patterns = registration
            .matches
            .iter()
            .map(|pattern| pattern.parse::<MatchPattern>())
            .collect::<Result<Vec<_>>>()?;

        info!(
            script_id = %registration.id,
            patterns = patterns.len(),
            run_at = %registration.run_at,
            "content script registered"
        );
        let replaced = self
            .scripts
            .write()
            .insert(registration.id.clone(), (registration, patterns))
            .is_some();
        if replaced {
            debug!("previous registration replaced");
        }
        Ok(())
    }

    async fn unregister(&self, script_id: &str) -> Result<()> {
        if self.scripts.write().remove(script_id).is_none() {
            warn!(script_id, "unregister of unknown content script ignored");
        }
        Ok(())
    }

    fn is_tracked(&self, url: &str) -> bool {
        self.scripts
            .read()
            .values()
            .any(|(_, patterns)| patterns.iter().any(|pattern| pattern.matches_str(url)))
    }
}
