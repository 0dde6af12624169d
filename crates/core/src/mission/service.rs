//! Mission lifecycle service - core business logic

use std::sync::Arc;

use chrono::Utc;
use delegate_domain::constants::TRACKER_SCRIPT_PATH;
use delegate_domain::{
    Activity, DelegateError, Mission, MissionTime, NewMission, Result, TrackingConfig,
    UrlPermission,
};
use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, info, warn};
use url::Url;

use super::patterns::MatchPattern;
use super::ports::{ActiveTab, ScriptRegistration, ScriptRegistry};
use crate::store::TypedStore;

/// Serializes state transitions that touch the active mission.
///
/// Requests arrive concurrently and unordered; holding the gate across a
/// read-modify-write keeps "at most one active mission" intact and stops an
/// activity from landing between an end-mission snapshot and its clear.
#[derive(Clone, Default)]
pub struct TransitionGate(Arc<Mutex<()>>);

impl TransitionGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn enter(&self) -> MutexGuard<'_, ()> {
        self.0.lock().await
    }
}

/// Owns the Active → Running → Ended transitions.
pub struct MissionLifecycle {
    store: TypedStore,
    tabs: Arc<dyn ActiveTab>,
    scripts: Arc<dyn ScriptRegistry>,
    tracking: TrackingConfig,
    gate: TransitionGate,
}

impl MissionLifecycle {
    pub fn new(
        store: TypedStore,
        tabs: Arc<dyn ActiveTab>,
        scripts: Arc<dyn ScriptRegistry>,
        tracking: TrackingConfig,
        gate: TransitionGate,
    ) -> Self {
        Self { store, tabs, scripts, tracking, gate }
    }

    /// Create a mission in the Active state and deactivate all others.
    pub async fn add_mission(&self, name: &str, mission_time: &str) -> Result<Mission> {
        if name.trim().is_empty() {
            return Err(DelegateError::Validation("mission name must not be empty".into()));
        }
        let mission_time = MissionTime::parse(mission_time)?;

        let _guard = self.gate.enter().await;
        if self.store.find_by_index::<Mission>("name", name).await?.is_some() {
            return Err(DelegateError::Conflict(format!("mission {name:?} already exists")));
        }

        let draft = NewMission::draft(name, mission_time);
        let id = self.store.add::<Mission>(&draft).await?;
        let mission = draft.into_mission(id);

        for mut other in self.store.get_all::<Mission>().await? {
            if other.id == id || !other.active {
                continue;
            }
            other.active = false;
            other.running = false;
            if let Err(err) = self.store.update(&other).await {
                warn!(mission_id = other.id, error = %err, "failed to deactivate mission");
            }
        }

        info!(mission_id = id, name = %mission.name, "mission created");
        Ok(mission)
    }

    /// Start the active mission on a permitted page.
    ///
    /// Returns `true` once tracking is registered and the mission is
    /// running. Starting an already running mission changes nothing.
    pub async fn start_mission(&self) -> Result<bool> {
        let url = self.tabs.active_url().await?.ok_or(DelegateError::NoActiveTab)?;
        let Some(host) = hostname(&url)? else {
            return Err(DelegateError::PermissionDenied(format!(
                "tracking is not permitted on {url}"
            )));
        };

        if self.store.find_by_index::<UrlPermission>("url", &host).await?.is_none() {
            return Err(DelegateError::PermissionDenied(format!(
                "tracking is not permitted on {host}"
            )));
        }

        let _guard = self.gate.enter().await;
        let mut mission = self.active_mission().await?.ok_or(DelegateError::NoActiveMission)?;
        if mission.running {
            debug!(mission_id = mission.id, "mission already running");
            return Ok(true);
        }

        let permissions = self.store.get_all::<UrlPermission>().await?;
        self.scripts.register(self.registration(&permissions)).await?;

        mission.start(now_ms());
        self.store.update(&mission).await?;
        info!(mission_id = mission.id, host = %host, "mission started");
        Ok(true)
    }

    /// End the active mission, moving every pending activity into it.
    ///
    /// Returns the ended mission, or `None` when nothing was active.
    pub async fn end_mission(&self) -> Result<Option<Mission>> {
        let guard = self.gate.enter().await;
        let ended = match self.active_mission().await? {
            Some(mut mission) => {
                let activities = self.store.get_all::<Activity>().await?;
                mission.end(now_ms(), activities);
                self.store.replace_and_clear::<Mission, Activity>(&mission).await?;
                info!(
                    mission_id = mission.id,
                    activities = mission.activities.len(),
                    "mission ended"
                );
                Some(mission)
            }
            None => {
                debug!("end requested without an active mission");
                None
            }
        };
        drop(guard);

        if let Err(err) = self.scripts.unregister(&self.tracking.script_id).await {
            warn!(error = %err, "failed to unregister click tracking");
        }
        Ok(ended)
    }

    /// The mission with `active = true`, if any.
    pub async fn current_mission(&self) -> Result<Option<Mission>> {
        self.active_mission().await
    }

    pub async fn missions(&self) -> Result<Vec<Mission>> {
        self.store.get_all::<Mission>().await
    }

    async fn active_mission(&self) -> Result<Option<Mission>> {
        Ok(self.store.get_all::<Mission>().await?.into_iter().find(|mission| mission.active))
    }

    fn registration(&self, permissions: &[UrlPermission]) -> ScriptRegistration {
        ScriptRegistration {
            id: self.tracking.script_id.clone(),
            js: vec![TRACKER_SCRIPT_PATH.to_string()],
            matches: permissions
                .iter()
                .map(|permission| {
                    MatchPattern::for_host(&self.tracking.url_scheme, &permission.url).to_string()
                })
                .collect(),
            run_at: self.tracking.run_at,
        }
    }
}

/// Hostname of `url`, lowercased. `None` for host-less pages such as
/// `file:` or `about:` URLs.
pub fn hostname(url: &str) -> Result<Option<String>> {
    let parsed = Url::parse(url)
        .map_err(|err| DelegateError::Validation(format!("invalid tab url {url:?}: {err}")))?;
    Ok(parsed.host_str().filter(|host| !host.is_empty()).map(str::to_ascii_lowercase))
}

fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hostname_ignores_path_port_and_case() {
        assert_eq!(
            hostname("https://Docs.Example.com:8443/a?b").unwrap().as_deref(),
            Some("docs.example.com")
        );
        assert_eq!(hostname("about:blank").unwrap(), None);
        assert_eq!(hostname("file:///home/me/page.html").unwrap(), None);
        assert!(hostname("not a url").is_err());
    }
}
