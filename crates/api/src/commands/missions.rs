//! Mission lifecycle commands

use std::sync::Arc;

use delegate_domain::{Mission, Result};
use tracing::info;

use crate::utils::command_helpers::execute_logged;
use crate::AppContext;

pub async fn add_mission(
    ctx: &Arc<AppContext>,
    mission_name: &str,
    mission_time: &str,
) -> Result<Mission> {
    execute_logged("missions::add_mission", || ctx.missions.add_mission(mission_name, mission_time))
        .await
}

/// Start the active mission on the focused tab's host.
pub async fn start_mission(ctx: &Arc<AppContext>) -> Result<bool> {
    info!(command = "missions::start_mission", "Starting mission tracking");
    execute_logged("missions::start_mission", || ctx.missions.start_mission()).await
}

/// End the active mission. Answers with the ended mission, or `null` when
/// nothing was active.
pub async fn end_mission(ctx: &Arc<AppContext>) -> Result<Option<Mission>> {
    info!(command = "missions::end_mission", "Ending mission tracking");
    execute_logged("missions::end_mission", || ctx.missions.end_mission()).await
}

pub async fn get_current_mission(ctx: &Arc<AppContext>) -> Result<Option<Mission>> {
    execute_logged("missions::get_current_mission", || ctx.missions.current_mission()).await
}

pub async fn get_missions(ctx: &Arc<AppContext>) -> Result<Vec<Mission>> {
    execute_logged("missions::get_missions", || ctx.missions.missions()).await
}
