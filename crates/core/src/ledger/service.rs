//! Activity ledger service

use std::sync::Arc;

use delegate_domain::{Activity, DelegateError, Mission, NewActivity, RecordId, Result};
use tracing::{debug, warn};

use crate::events::{Broadcaster, Notification};
use crate::mission::TransitionGate;
use crate::store::TypedStore;

/// Records activities while a mission is active.
pub struct ActivityLedger {
    store: TypedStore,
    broadcaster: Arc<dyn Broadcaster>,
    gate: TransitionGate,
}

impl ActivityLedger {
    pub fn new(store: TypedStore, broadcaster: Arc<dyn Broadcaster>, gate: TransitionGate) -> Self {
        Self { store, broadcaster, gate }
    }

    /// Store a captured activity and announce it to listeners.
    ///
    /// The announcement is not part of the write; failing to deliver it
    /// leaves the activity stored.
    pub async fn add(&self, draft: NewActivity) -> Result<Activity> {
        let activity = {
            let _guard = self.gate.enter().await;
            let missions = self.store.get_all::<Mission>().await?;
            if !missions.iter().any(|mission| mission.active) {
                return Err(DelegateError::NoActiveMission);
            }
            let id = self.store.add::<Activity>(&draft).await?;
            draft.into_activity(id)
        };

        match self.broadcaster.publish(Notification::ActivityAdded(activity.clone())) {
            Ok(receivers) => debug!(activity_id = activity.id, receivers, "activity broadcast"),
            Err(err) => warn!(activity_id = activity.id, error = %err, "activity broadcast failed"),
        }
        Ok(activity)
    }

    pub async fn remove_one(&self, id: RecordId) -> Result<RecordId> {
        self.store.remove::<Activity>(id).await
    }

    pub async fn remove_all(&self) -> Result<()> {
        self.store.remove_all::<Activity>().await
    }

    /// Change an activity's title. Without a non-empty title nothing
    /// happens and `None` is returned.
    pub async fn update(&self, id: RecordId, title: Option<&str>) -> Result<Option<Activity>> {
        let Some(title) = title.filter(|title| !title.is_empty()) else {
            return Ok(None);
        };
        let mut activity = self
            .store
            .find::<Activity>(id)
            .await?
            .ok_or_else(|| DelegateError::NotFound(format!("activity {id}")))?;
        activity.activity_title = title.to_string();
        self.store.update(&activity).await?;
        Ok(Some(activity))
    }

    pub async fn get_all(&self) -> Result<Vec<Activity>> {
        self.store.get_all::<Activity>().await
    }
}
