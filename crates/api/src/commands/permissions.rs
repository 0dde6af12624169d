//! URL permission commands

use std::sync::Arc;

use delegate_domain::{RecordId, Result, UrlPermission};

use crate::utils::command_helpers::execute_logged;
use crate::AppContext;

pub async fn add_url_permission(ctx: &Arc<AppContext>, url: &str) -> Result<RecordId> {
    execute_logged("permissions::add_url_permission", || ctx.permissions.add(url)).await
}

pub async fn get_url_permissions(ctx: &Arc<AppContext>) -> Result<Vec<UrlPermission>> {
    execute_logged("permissions::get_url_permissions", || ctx.permissions.list()).await
}

/// Revoke a permission; the settings page is told through `urlPermissionRemoved`.
pub async fn remove_url_permission(ctx: &Arc<AppContext>, id: RecordId) -> Result<RecordId> {
    execute_logged("permissions::remove_url_permission", || ctx.permissions.remove(id)).await
}

pub async fn get_url_permission(
    ctx: &Arc<AppContext>,
    url: &str,
) -> Result<Option<UrlPermission>> {
    execute_logged("permissions::get_url_permission", || ctx.permissions.find(url)).await
}
