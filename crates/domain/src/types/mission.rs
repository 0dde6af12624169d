//! Missions: named, time-boxed tracking sessions

use serde::{Deserialize, Serialize};

use super::{Activity, RecordId};
use crate::impl_domain_status_conversions;
use crate::utils::timer::MissionTime;

/// A stored mission.
///
/// `running` implies `active`; at most one mission is active at a time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mission {
    pub id: RecordId,
    pub name: String,
    pub active: bool,
    pub running: bool,
    pub mission_time: MissionTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<i64>,
    #[serde(default)]
    pub activities: Vec<Activity>,
}

/// Mission payload before the store assigns an id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMission {
    pub name: String,
    pub active: bool,
    pub running: bool,
    pub mission_time: MissionTime,
    pub activities: Vec<Activity>,
}

/// Per-mission lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissionState {
    Active,
    Running,
    Ended,
}

impl_domain_status_conversions!(MissionState {
    Active => "active",
    Running => "running",
    Ended => "ended",
});

impl NewMission {
    /// A freshly created mission: active, not yet running, no activities.
    pub fn draft(name: impl Into<String>, mission_time: MissionTime) -> Self {
        Self { name: name.into(), active: true, running: false, mission_time, activities: Vec::new() }
    }

    pub fn into_mission(self, id: RecordId) -> Mission {
        Mission {
            id,
            name: self.name,
            active: self.active,
            running: self.running,
            mission_time: self.mission_time,
            start_time: None,
            end_time: None,
            activities: self.activities,
        }
    }
}

impl Mission {
    pub fn state(&self) -> MissionState {
        match (self.active, self.running) {
            (true, true) => MissionState::Running,
            (true, false) => MissionState::Active,
            (false, _) => MissionState::Ended,
        }
    }

    /// Mark running and stamp the start time.
    pub fn start(&mut self, now_ms: i64) {
        self.running = true;
        self.start_time = Some(now_ms);
    }

    /// Close the mission, absorbing the pending activities.
    pub fn end(&mut self, now_ms: i64, activities: Vec<Activity>) {
        self.active = false;
        self.running = false;
        self.end_time = Some(now_ms);
        self.activities = activities;
    }

    /// Plain-text summary of the mission and its captured activities.
    pub fn report(&self) -> String {
        let stamp = |value: Option<i64>| {
            value
                .and_then(chrono::DateTime::from_timestamp_millis)
                .map_or_else(|| "N/A".to_string(), |at| at.to_rfc3339())
        };

        let mut out = format!(
            "Mission name: {}\n  active: {}\n  running: {}\n  missionTime: {}\n  startTime: {}\n  endTime: {}\n",
            self.name,
            self.active,
            self.running,
            self.mission_time,
            stamp(self.start_time),
            stamp(self.end_time),
        );
        for activity in &self.activities {
            out.push_str(&format!(
                "  Activity #{}\n    action: click\n    url: {}\n    activityTitle: {}\n    element: {}\n    selector: {}\n",
                activity.id,
                activity.url,
                activity.activity_title,
                activity.target().to_markup(),
                activity.selector,
            ));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mission() -> Mission {
        NewMission::draft("Focus", MissionTime::parse("15min").unwrap()).into_mission(1)
    }

    #[test]
    fn new_missions_start_active() {
        let mission = mission();
        assert_eq!(mission.state(), MissionState::Active);
        assert!(mission.start_time.is_none());
    }

    #[test]
    fn start_and_end_drive_the_state() {
        let mut mission = mission();
        mission.start(1_000);
        assert_eq!(mission.state(), MissionState::Running);
        assert_eq!(mission.start_time, Some(1_000));

        mission.end(2_000, Vec::new());
        assert_eq!(mission.state(), MissionState::Ended);
        assert!(!mission.running);
        assert_eq!(mission.end_time, Some(2_000));
    }

    #[test]
    fn optional_times_are_omitted_on_the_wire() {
        let json = serde_json::to_value(mission()).unwrap();
        assert_eq!(json["missionTime"], "15min");
        assert!(json.get("startTime").is_none());
        assert!(json.get("endTime").is_none());
    }

    #[test]
    fn report_lists_activity_selectors() {
        let mut mission = mission();
        let activity = crate::NewActivity::click(
            "https://example.com/",
            "Go",
            crate::TargetElement::new("a", vec![("id".into(), "go".into())]),
            r#"a[id="go"]"#,
        )
        .into_activity(3);
        mission.end(0, vec![activity]);

        let report = mission.report();
        assert!(report.contains("Mission name: Focus"));
        assert!(report.contains("startTime: N/A"));
        assert!(report.contains(r#"selector: a[id="go"]"#));
    }
}
