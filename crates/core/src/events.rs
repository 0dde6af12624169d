//! Outbound notifications pushed to every listening UI surface

use delegate_domain::{Activity, RecordId, Result};
use serde::{Deserialize, Serialize};

/// Fire-and-forget events emitted by the coordinator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "eventName", rename_all = "camelCase")]
pub enum Notification {
    /// A newly stored activity, id included.
    ActivityAdded(Activity),
    UrlPermissionRemoved { id: RecordId },
}

impl Notification {
    pub fn event_name(&self) -> &'static str {
        match self {
            Self::ActivityAdded(_) => delegate_domain::constants::EVENT_ACTIVITY_ADDED,
            Self::UrlPermissionRemoved { .. } => {
                delegate_domain::constants::EVENT_URL_PERMISSION_REMOVED
            }
        }
    }
}

/// Port for delivering notifications to subscribers.
pub trait Broadcaster: Send + Sync {
    /// Deliver to current subscribers and return how many received it.
    fn publish(&self, notification: Notification) -> Result<usize>;
}
