//! Fakes for the tab, script registry and broadcaster ports

use async_trait::async_trait;
use delegate_core::{Broadcaster, MatchPattern, Notification, ScriptRegistration, ScriptRegistry};
use delegate_core::mission::ports::ActiveTab;
use delegate_domain::{DelegateError, Result};
use parking_lot::Mutex;

/// Active tab whose URL the test sets directly.
#[derive(Default)]
pub struct FakeTab {
    url: Mutex<Option<String>>,
}

impl FakeTab {
    pub fn open(&self, url: &str) {
        *self.url.lock() = Some(url.to_string());
    }

    pub fn close(&self) {
        *self.url.lock() = None;
    }
}

#[async_trait]
impl ActiveTab for FakeTab {
    async fn active_url(&self) -> Result<Option<String>> {
        Ok(self.url.lock().clone())
    }
}

/// Script registry that remembers the current registration.
#[derive(Default)]
pub struct RecordingScripts {
    current: Mutex<Option<ScriptRegistration>>,
    unregistered: Mutex<usize>,
    fail_register: Mutex<bool>,
}

impl RecordingScripts {
    pub fn current(&self) -> Option<ScriptRegistration> {
        self.current.lock().clone()
    }

    pub fn unregister_calls(&self) -> usize {
        *self.unregistered.lock()
    }

    pub fn fail_register(&self, fail: bool) {
        *self.fail_register.lock() = fail;
    }

    /// Register directly, bypassing the mission lifecycle.
    pub fn track(&self, patterns: &[&str]) {
        *self.current.lock() = Some(ScriptRegistration {
            id: "activityTracker".into(),
            js: Vec::new(),
            matches: patterns.iter().map(|p| p.to_string()).collect(),
            run_at: delegate_domain::RunAt::DocumentEnd,
        });
    }
}

#[async_trait]
impl ScriptRegistry for RecordingScripts {
    async fn register(&self, registration: ScriptRegistration) -> Result<()> {
        if *self.fail_register.lock() {
            return Err(DelegateError::Internal("registration rejected".into()));
        }
        *self.current.lock() = Some(registration);
        Ok(())
    }

    async fn unregister(&self, script_id: &str) -> Result<()> {
        *self.unregistered.lock() += 1;
        let mut current = self.current.lock();
        if current.as_ref().is_some_and(|registration| registration.id == script_id) {
            *current = None;
        }
        Ok(())
    }

    fn is_tracked(&self, url: &str) -> bool {
        self.current.lock().as_ref().is_some_and(|registration| {
            registration
                .matches
                .iter()
                .filter_map(|pattern| pattern.parse::<MatchPattern>().ok())
                .any(|pattern| pattern.matches_str(url))
        })
    }
}

/// Broadcaster that keeps every published notification.
#[derive(Default)]
pub struct RecordingBroadcaster {
    sent: Mutex<Vec<Notification>>,
    fail: Mutex<bool>,
}

impl RecordingBroadcaster {
    pub fn sent(&self) -> Vec<Notification> {
        self.sent.lock().clone()
    }

    pub fn fail(&self, fail: bool) {
        *self.fail.lock() = fail;
    }
}

impl Broadcaster for RecordingBroadcaster {
    fn publish(&self, notification: Notification) -> Result<usize> {
        if *self.fail.lock() {
            return Err(DelegateError::Internal("no listeners".into()));
        }
        self.sent.lock().push(notification);
        Ok(1)
    }
}
