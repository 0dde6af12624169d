//! Recorded click activities

use serde::{Deserialize, Serialize};

use super::{RecordId, TargetElement};

/// Kind of interaction that produced an activity. Only clicks are captured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ActivityAction {
    #[default]
    Click,
}

/// A single recorded click with its resolved target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: RecordId,
    pub action: ActivityAction,
    pub url: String,
    pub activity_title: String,
    pub element_name: String,
    pub attributes: Vec<(String, String)>,
    pub selector: String,
}

/// Activity payload before the store assigns an id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewActivity {
    #[serde(default)]
    pub action: ActivityAction,
    pub url: String,
    #[serde(default)]
    pub activity_title: String,
    pub element_name: String,
    #[serde(default)]
    pub attributes: Vec<(String, String)>,
    pub selector: String,
}

impl NewActivity {
    /// Build a click activity for `target`.
    pub fn click(
        url: impl Into<String>,
        activity_title: impl Into<String>,
        target: TargetElement,
        selector: impl Into<String>,
    ) -> Self {
        Self {
            action: ActivityAction::Click,
            url: url.into(),
            activity_title: activity_title.into(),
            element_name: target.element_name,
            attributes: target.attributes,
            selector: selector.into(),
        }
    }

    /// Attach the store-assigned id.
    pub fn into_activity(self, id: RecordId) -> Activity {
        Activity {
            id,
            action: self.action,
            url: self.url,
            activity_title: self.activity_title,
            element_name: self.element_name,
            attributes: self.attributes,
            selector: self.selector,
        }
    }
}

impl Activity {
    /// Serialized element this activity was captured on.
    pub fn target(&self) -> TargetElement {
        TargetElement { element_name: self.element_name.clone(), attributes: self.attributes.clone() }
    }
}
