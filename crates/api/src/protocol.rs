//! Message protocol spoken with the extension
//!
//! Every inbound frame is a JSON object whose `eventName` field selects the
//! command. Callers that multiplex requests over one channel may add a
//! `requestId`; it is echoed back untouched on the matching response.

use delegate_domain::{DelegateError, NewActivity, RecordId, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Field carrying the command discriminant.
pub const EVENT_NAME_FIELD: &str = "eventName";
/// Optional correlation field echoed on responses.
pub const REQUEST_ID_FIELD: &str = "requestId";

/// Commands accepted by the coordinator.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "eventName", rename_all = "camelCase")]
pub enum InboundMessage {
    /// Sent by the tracker script after a click. Older scripts use `activity`.
    #[serde(alias = "activity")]
    AddActivity(NewActivity),
    RemoveActivity {
        id: RecordId,
    },
    RemoveActivities,
    UpdateActivity {
        id: RecordId,
        #[serde(default)]
        title: Option<String>,
    },
    GetActivities,
    #[serde(rename_all = "camelCase")]
    AddMission {
        mission_name: String,
        mission_time: String,
    },
    StartMission,
    EndMission,
    GetCurrentMission,
    GetMissions,
    #[serde(rename = "addURLPermission")]
    AddUrlPermission {
        url: String,
    },
    #[serde(rename = "getURLPermissions")]
    GetUrlPermissions,
    #[serde(rename = "removeURLPermission")]
    RemoveUrlPermission {
        id: RecordId,
    },
    #[serde(rename = "getURLPermission")]
    GetUrlPermission {
        url: String,
    },
    /// Handled by the content script of the page; the coordinator stays silent.
    ScrollIntoView {
        selector: String,
    },
    /// The browser focused a tab or navigated the focused one.
    TabUpdated {
        url: String,
    },
    #[serde(other)]
    Unknown,
}

impl InboundMessage {
    /// Wire name used in logs.
    pub fn command_name(&self) -> &'static str {
        match self {
            Self::AddActivity(_) => "activities::add_activity",
            Self::RemoveActivity { .. } => "activities::remove_activity",
            Self::RemoveActivities => "activities::remove_activities",
            Self::UpdateActivity { .. } => "activities::update_activity",
            Self::GetActivities => "activities::get_activities",
            Self::AddMission { .. } => "missions::add_mission",
            Self::StartMission => "missions::start_mission",
            Self::EndMission => "missions::end_mission",
            Self::GetCurrentMission => "missions::get_current_mission",
            Self::GetMissions => "missions::get_missions",
            Self::AddUrlPermission { .. } => "permissions::add_url_permission",
            Self::GetUrlPermissions => "permissions::get_url_permissions",
            Self::RemoveUrlPermission { .. } => "permissions::remove_url_permission",
            Self::GetUrlPermission { .. } => "permissions::get_url_permission",
            Self::ScrollIntoView { .. } => "page::scroll_into_view",
            Self::TabUpdated { .. } => "tabs::tab_updated",
            Self::Unknown => "unknown",
        }
    }
}

/// A decoded frame: the command plus its optional correlation id.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub request_id: Option<Value>,
    pub message: InboundMessage,
}

impl Request {
    /// Decode a raw frame.
    ///
    /// Returns `Ok(None)` when the frame has no string `eventName` at all,
    /// since such frames belong to some other listener. A recognised command
    /// with a malformed payload is a `Validation` error.
    pub fn from_value(mut frame: Value) -> Result<Option<Self>> {
        let Some(object) = frame.as_object_mut() else {
            return Ok(None);
        };
        if !object.get(EVENT_NAME_FIELD).is_some_and(Value::is_string) {
            return Ok(None);
        }
        let request_id = object.remove(REQUEST_ID_FIELD);

        let message = serde_json::from_value(frame)
            .map_err(|err| DelegateError::Validation(format!("malformed message: {err}")))?;
        Ok(Some(Self { request_id, message }))
    }
}

/// Reply envelope: `{ data }` on success, `{ error }` on failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<DelegateError>,
}

impl Response {
    /// Successful reply. `()` and `None` payloads serialize as `null`.
    pub fn success<T: Serialize>(data: &T) -> Self {
        match serde_json::to_value(data) {
            Ok(value) => Self { request_id: None, data: Some(value), error: None },
            Err(err) => Self::failure(err.into()),
        }
    }

    pub fn failure(error: DelegateError) -> Self {
        Self { request_id: None, data: None, error: Some(error) }
    }

    pub fn from_result<T: Serialize>(result: Result<T>) -> Self {
        match result {
            Ok(data) => Self::success(&data),
            Err(err) => Self::failure(err),
        }
    }

    pub fn with_request_id(mut self, request_id: Option<Value>) -> Self {
        self.request_id = request_id;
        self
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

#[cfg(test)]
mod tests {
    use delegate_domain::ActivityAction;
    use serde_json::json;

    use super::*;

    fn decode(frame: Value) -> InboundMessage {
        Request::from_value(frame).unwrap().unwrap().message
    }

    #[test]
    fn tracker_clicks_decode_under_both_names() {
        let payload = json!({
            "action": "click",
            "url": "https://example.com/",
            "activityTitle": "Sign in",
            "elementName": "button",
            "attributes": [["id", "login"]],
            "selector": "button[id=\"login\"]",
        });
        for name in ["addActivity", "activity"] {
            let mut frame = payload.clone();
            frame["eventName"] = json!(name);
            let InboundMessage::AddActivity(draft) = decode(frame) else {
                panic!("{name} did not decode as addActivity");
            };
            assert_eq!(draft.action, ActivityAction::Click);
            assert_eq!(draft.attributes, vec![("id".to_string(), "login".to_string())]);
        }
    }

    #[test]
    fn permission_commands_keep_their_upper_case_names() {
        assert_eq!(
            decode(json!({"eventName": "addURLPermission", "url": "example.com"})),
            InboundMessage::AddUrlPermission { url: "example.com".into() }
        );
        assert_eq!(
            decode(json!({"eventName": "getURLPermissions"})),
            InboundMessage::GetUrlPermissions
        );
        assert_eq!(
            decode(json!({"eventName": "removeURLPermission", "id": 2})),
            InboundMessage::RemoveUrlPermission { id: 2 }
        );
    }

    #[test]
    fn mission_fields_are_camel_case() {
        assert_eq!(
            decode(json!({"eventName": "addMission", "missionName": "Focus", "missionTime": "15min"})),
            InboundMessage::AddMission { mission_name: "Focus".into(), mission_time: "15min".into() }
        );
    }

    #[test]
    fn update_title_is_optional() {
        assert_eq!(
            decode(json!({"eventName": "updateActivity", "id": 3})),
            InboundMessage::UpdateActivity { id: 3, title: None }
        );
    }

    #[test]
    fn unit_commands_ignore_extra_fields() {
        assert_eq!(
            decode(json!({"eventName": "startMission", "source": "popup"})),
            InboundMessage::StartMission
        );
    }

    #[test]
    fn unknown_event_names_decode_as_unknown() {
        assert_eq!(decode(json!({"eventName": "activityAdded", "id": 1})), InboundMessage::Unknown);
    }

    #[test]
    fn frames_without_an_event_name_are_not_ours() {
        assert!(Request::from_value(json!({"id": 1})).unwrap().is_none());
        assert!(Request::from_value(json!({"eventName": 5})).unwrap().is_none());
        assert!(Request::from_value(json!(["addMission"])).unwrap().is_none());
    }

    #[test]
    fn malformed_payloads_are_validation_errors() {
        let err = Request::from_value(json!({"eventName": "removeActivity", "id": "seven"}))
            .unwrap_err();
        assert!(matches!(err, DelegateError::Validation(_)));
    }

    #[test]
    fn request_id_is_split_off_and_echoed() {
        let request =
            Request::from_value(json!({"eventName": "getMissions", "requestId": "r-1"}))
                .unwrap()
                .unwrap();
        assert_eq!(request.message, InboundMessage::GetMissions);

        let response = Response::success(&Vec::<u8>::new()).with_request_id(request.request_id);
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({"requestId": "r-1", "data": []})
        );
    }

    #[test]
    fn empty_success_still_carries_data() {
        let json = serde_json::to_value(Response::success(&())).unwrap();
        assert_eq!(json, json!({"data": null}));
    }

    #[test]
    fn failures_carry_the_typed_error() {
        let json = serde_json::to_value(Response::failure(DelegateError::NoActiveMission)).unwrap();
        assert_eq!(json, json!({"error": {"type": "NoActiveMission"}}));
    }
}
