//! Command handlers behind the event router
//!
//! Each function wraps exactly one service operation and is timed and
//! logged through [`execute_logged`](crate::utils::command_helpers::execute_logged).

pub mod activities;
pub mod missions;
pub mod permissions;

pub use activities::{
    add_activity, get_activities, remove_activities, remove_activity, update_activity,
};
pub use missions::{add_mission, end_mission, get_current_mission, get_missions, start_mission};
pub use permissions::{
    add_url_permission, get_url_permission, get_url_permissions, remove_url_permission,
};
