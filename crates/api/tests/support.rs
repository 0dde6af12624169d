#![allow(dead_code)]

use std::sync::Arc;

use delegate_domain::{Config, DatabaseConfig};
use delegate_host::{AppContext, EventRouter};
use serde_json::{json, Value};
use tempfile::TempDir;

/// A router over a fresh SQLite database in a temporary directory.
pub struct TestHost {
    pub ctx: Arc<AppContext>,
    pub router: EventRouter,
    /// Keep temporary directory alive for the lifetime of the host.
    _temp_dir: TempDir,
}

pub fn setup_test_host() -> TestHost {
    let temp_dir = tempfile::tempdir().expect("failed to create temporary database directory");
    let config = Config {
        database: DatabaseConfig {
            path: temp_dir.path().join("delegate.db").to_string_lossy().into_owned(),
            ..DatabaseConfig::default()
        },
        ..Config::default()
    };
    let ctx = Arc::new(AppContext::new(config));
    let router = EventRouter::new(Arc::clone(&ctx));
    TestHost { ctx, router, _temp_dir: temp_dir }
}

impl TestHost {
    /// Route `frame` and return the serialized response.
    pub async fn send(&self, frame: Value) -> Value {
        let response = self.router.handle(frame.clone()).await;
        let response = response.unwrap_or_else(|| panic!("no response to {frame}"));
        serde_json::to_value(response).expect("response serializes")
    }

    /// Route `frame` and return its `data`, failing on an error response.
    pub async fn data(&self, frame: Value) -> Value {
        let response = self.send(frame.clone()).await;
        assert!(response.get("error").is_none(), "{frame} failed: {response}");
        response.get("data").cloned().unwrap_or_else(|| panic!("{frame} returned no data"))
    }

    /// Route `frame` and return the error `type`, failing on success.
    pub async fn error_type(&self, frame: Value) -> String {
        let response = self.send(frame.clone()).await;
        response["error"]["type"]
            .as_str()
            .unwrap_or_else(|| panic!("{frame} unexpectedly succeeded: {response}"))
            .to_string()
    }

    /// Grant tracking on `host` and focus a tab on it.
    pub async fn focus_permitted(&self, host: &str) {
        self.data(json!({"eventName": "addURLPermission", "url": host})).await;
        self.ctx.tabs.update(format!("https://{host}/start"));
    }
}

pub fn add_mission(name: &str, time: &str) -> Value {
    json!({"eventName": "addMission", "missionName": name, "missionTime": time})
}

pub fn event(name: &str) -> Value {
    json!({"eventName": name})
}

/// An `addActivity` frame as the tracker script sends it.
pub fn click(title: &str) -> Value {
    json!({
        "eventName": "addActivity",
        "action": "click",
        "url": "https://example.com/start",
        "activityTitle": title,
        "elementName": "button",
        "attributes": [["class", "primary"]],
        "selector": "button[class=\"primary\"]",
    })
}
