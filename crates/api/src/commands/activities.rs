//! Activity ledger commands

use std::sync::Arc;

use delegate_domain::{Activity, NewActivity, RecordId, Result};
use tracing::debug;

use crate::utils::command_helpers::execute_logged;
use crate::AppContext;

/// Store a captured click and broadcast it to listening surfaces.
pub async fn add_activity(ctx: &Arc<AppContext>, draft: NewActivity) -> Result<Activity> {
    debug!(url = %draft.url, element = %draft.element_name, "recording activity");
    execute_logged("activities::add_activity", || ctx.ledger.add(draft)).await
}

pub async fn remove_activity(ctx: &Arc<AppContext>, id: RecordId) -> Result<RecordId> {
    execute_logged("activities::remove_activity", || ctx.ledger.remove_one(id)).await
}

pub async fn remove_activities(ctx: &Arc<AppContext>) -> Result<()> {
    execute_logged("activities::remove_activities", || ctx.ledger.remove_all()).await
}

/// Rename an activity. Without a title this is a no-op answering `null`.
pub async fn update_activity(
    ctx: &Arc<AppContext>,
    id: RecordId,
    title: Option<String>,
) -> Result<Option<Activity>> {
    execute_logged("activities::update_activity", || ctx.ledger.update(id, title.as_deref()))
        .await
}

pub async fn get_activities(ctx: &Arc<AppContext>) -> Result<Vec<Activity>> {
    execute_logged("activities::get_activities", || ctx.ledger.get_all()).await
}
