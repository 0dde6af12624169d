//! Shared test helpers for `delegate-core` integration tests.
//!
//! In-memory implementations of every core port so service tests run
//! without SQLite or a browser.

#![allow(dead_code)]

pub mod fakes;
pub mod store;

use std::sync::Arc;

use delegate_core::{
    ActivityLedger, MissionLifecycle, PermissionRegistry, TransitionGate, TypedStore,
};
use delegate_domain::{NewActivity, TargetElement, TrackingConfig};

pub use fakes::{FakeTab, RecordingBroadcaster, RecordingScripts};
pub use store::MemoryStore;

/// Services wired over shared in-memory fakes.
pub struct Harness {
    pub store: Arc<MemoryStore>,
    pub tab: Arc<FakeTab>,
    pub scripts: Arc<RecordingScripts>,
    pub broadcaster: Arc<RecordingBroadcaster>,
    pub missions: MissionLifecycle,
    pub ledger: ActivityLedger,
    pub permissions: PermissionRegistry,
}

impl Harness {
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::default());
        let tab = Arc::new(FakeTab::default());
        let scripts = Arc::new(RecordingScripts::default());
        let broadcaster = Arc::new(RecordingBroadcaster::default());
        let typed = TypedStore::new(store.clone());
        let gate = TransitionGate::new();

        Self {
            missions: MissionLifecycle::new(
                typed.clone(),
                tab.clone(),
                scripts.clone(),
                TrackingConfig::default(),
                gate.clone(),
            ),
            ledger: ActivityLedger::new(typed.clone(), broadcaster.clone(), gate),
            permissions: PermissionRegistry::new(typed, broadcaster.clone()),
            store,
            tab,
            scripts,
            broadcaster,
        }
    }
}

/// A click activity on a button with the given title.
pub fn click(title: &str) -> NewActivity {
    NewActivity::click(
        "https://example.com/page",
        title,
        TargetElement::new("button", vec![("name".into(), title.into())]),
        format!(r#"button[name="{title}"]"#),
    )
}
