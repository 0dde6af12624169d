//! Domain types and models
//!
//! Everything here is persisted as JSON documents and exchanged over the
//! message protocol, so field names serialize in camelCase.

pub mod activity;
pub mod element;
pub mod mission;
pub mod permission;

pub use activity::{Activity, ActivityAction, NewActivity};
pub use element::TargetElement;
pub use mission::{Mission, MissionState, NewMission};
pub use permission::{NewUrlPermission, UrlPermission};

/// Store-assigned primary key.
pub type RecordId = i64;
