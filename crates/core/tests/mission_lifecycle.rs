//! Mission lifecycle integration tests over in-memory ports.

mod support;

use delegate_core::Collection;
use delegate_domain::{DelegateError, MissionState};
use support::{click, Harness};

#[tokio::test]
async fn adding_a_mission_deactivates_the_previous_one() {
    let h = Harness::new();
    let first = h.missions.add_mission("Focus", "15min").await.unwrap();
    let second = h.missions.add_mission("Deep work", "20min").await.unwrap();

    let missions = h.missions.missions().await.unwrap();
    let active: Vec<_> = missions.iter().filter(|m| m.active).collect();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].id, second.id);
    assert_eq!(missions.iter().find(|m| m.id == first.id).unwrap().state(), MissionState::Ended);
}

#[tokio::test]
async fn duplicate_mission_name_is_a_conflict() {
    let h = Harness::new();
    h.missions.add_mission("Focus", "15min").await.unwrap();
    let err = h.missions.add_mission("Focus", "30min").await.unwrap_err();

    assert!(matches!(err, DelegateError::Conflict(_)));
    assert_eq!(h.store.len(Collection::Missions), 1);
}

#[tokio::test]
async fn names_are_case_sensitive() {
    let h = Harness::new();
    h.missions.add_mission("Focus", "15min").await.unwrap();
    assert!(h.missions.add_mission("focus", "15min").await.is_ok());
}

#[tokio::test]
async fn malformed_mission_time_is_rejected() {
    let h = Harness::new();
    for bad in ["abc", "100min", "15", "min", "15 min", ""] {
        let err = h.missions.add_mission("Focus", bad).await.unwrap_err();
        assert!(matches!(err, DelegateError::Validation(_)), "{bad:?} gave {err:?}");
    }
    let err = h.missions.add_mission("  ", "15min").await.unwrap_err();
    assert!(matches!(err, DelegateError::Validation(_)));
    assert_eq!(h.store.len(Collection::Missions), 0);
}

#[tokio::test]
async fn start_without_permission_is_denied() {
    let h = Harness::new();
    let mission = h.missions.add_mission("Focus", "15min").await.unwrap();
    h.tab.open("https://example.com/inbox");

    let err = h.missions.start_mission().await.unwrap_err();
    assert!(matches!(err, DelegateError::PermissionDenied(_)));

    let current = h.missions.current_mission().await.unwrap().unwrap();
    assert_eq!(current.id, mission.id);
    assert!(!current.running);
    assert!(h.scripts.current().is_none());
}

#[tokio::test]
async fn host_less_pages_are_denied() {
    let h = Harness::new();
    h.missions.add_mission("Focus", "15min").await.unwrap();
    h.permissions.add("example.com").await.unwrap();

    for url in ["file:///home/me/page.html", "about:blank"] {
        h.tab.open(url);
        let err = h.missions.start_mission().await.unwrap_err();
        assert!(matches!(err, DelegateError::PermissionDenied(_)), "{url} gave {err:?}");
    }
    assert!(h.scripts.current().is_none());
}

#[tokio::test]
async fn bare_host_with_port_permits_its_pages() {
    let h = Harness::new();
    h.missions.add_mission("Focus", "15min").await.unwrap();
    h.permissions.add("localhost:8080").await.unwrap();
    h.tab.open("https://localhost:8080/app");

    assert!(h.missions.start_mission().await.unwrap());
    let registration = h.scripts.current().unwrap();
    assert_eq!(registration.matches, vec!["https://localhost/*".to_string()]);
}

#[tokio::test]
async fn names_are_stored_exactly_as_given() {
    let h = Harness::new();
    let padded = h.missions.add_mission(" Focus ", "15min").await.unwrap();
    assert_eq!(padded.name, " Focus ");

    let plain = h.missions.add_mission("Focus", "15min").await.unwrap();
    assert_eq!(plain.name, "Focus");
    assert_eq!(h.store.len(Collection::Missions), 2);
}

#[tokio::test]
async fn start_requires_a_tab_and_an_active_mission() {
    let h = Harness::new();
    assert_eq!(h.missions.start_mission().await.unwrap_err(), DelegateError::NoActiveTab);

    h.tab.open("https://example.com/");
    h.permissions.add("example.com").await.unwrap();
    assert_eq!(h.missions.start_mission().await.unwrap_err(), DelegateError::NoActiveMission);
}

#[tokio::test]
async fn start_registers_tracking_for_every_permitted_host() {
    let h = Harness::new();
    h.permissions.add("example.com").await.unwrap();
    h.permissions.add("https://docs.rs/tokio").await.unwrap();
    h.missions.add_mission("Focus", "15min").await.unwrap();
    h.tab.open("https://EXAMPLE.com/settings");

    assert!(h.missions.start_mission().await.unwrap());

    let current = h.missions.current_mission().await.unwrap().unwrap();
    assert_eq!(current.state(), MissionState::Running);
    assert!(current.start_time.is_some());

    let registration = h.scripts.current().unwrap();
    assert_eq!(registration.id, "activityTracker");
    assert_eq!(registration.matches, vec!["https://example.com/*", "https://docs.rs/*"]);

    // Starting again is harmless.
    assert!(h.missions.start_mission().await.unwrap());
}

#[tokio::test]
async fn failed_registration_leaves_mission_idle() {
    let h = Harness::new();
    h.permissions.add("example.com").await.unwrap();
    h.missions.add_mission("Focus", "15min").await.unwrap();
    h.tab.open("https://example.com/");
    h.scripts.fail_register(true);

    assert!(h.missions.start_mission().await.is_err());
    assert!(!h.missions.current_mission().await.unwrap().unwrap().running);
}

#[tokio::test]
async fn end_moves_activities_into_the_mission() {
    let h = Harness::new();
    h.permissions.add("example.com").await.unwrap();
    h.missions.add_mission("Focus", "15min").await.unwrap();
    h.tab.open("https://example.com/");
    h.missions.start_mission().await.unwrap();

    let a = h.ledger.add(click("Save")).await.unwrap();
    let b = h.ledger.add(click("Send")).await.unwrap();

    let ended = h.missions.end_mission().await.unwrap().unwrap();
    assert_eq!(ended.state(), MissionState::Ended);
    assert!(ended.end_time.is_some());
    let ids: Vec<_> = ended.activities.iter().map(|activity| activity.id).collect();
    assert_eq!(ids, vec![a.id, b.id]);

    assert!(h.ledger.get_all().await.unwrap().is_empty());
    assert!(h.missions.current_mission().await.unwrap().is_none());
    assert!(h.scripts.current().is_none());

    let stored = h.missions.missions().await.unwrap();
    assert_eq!(stored[0].activities.len(), 2);
}

#[tokio::test]
async fn end_without_active_mission_is_a_no_op() {
    let h = Harness::new();
    assert!(h.missions.end_mission().await.unwrap().is_none());
    assert_eq!(h.scripts.unregister_calls(), 1);
}

#[tokio::test]
async fn end_of_an_unstarted_mission_still_ends_it() {
    let h = Harness::new();
    h.missions.add_mission("Focus", "15min").await.unwrap();
    let ended = h.missions.end_mission().await.unwrap().unwrap();
    assert!(!ended.active);
    assert!(ended.start_time.is_none());
}

#[tokio::test]
async fn concurrent_adds_leave_exactly_one_active_mission() {
    let h = std::sync::Arc::new(Harness::new());
    let mut handles = Vec::new();
    for i in 0..8 {
        let h = h.clone();
        handles.push(tokio::spawn(async move {
            h.missions.add_mission(&format!("Mission {i}"), "10min").await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let missions = h.missions.missions().await.unwrap();
    assert_eq!(missions.len(), 8);
    assert_eq!(missions.iter().filter(|m| m.active).count(), 1);
}
