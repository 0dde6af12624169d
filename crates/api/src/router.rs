//! Event router: one inbound command in, at most one response out.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};

use crate::commands;
use crate::protocol::{InboundMessage, Request, Response};
use crate::AppContext;

/// Dispatches decoded commands to the command handlers.
#[derive(Clone)]
pub struct EventRouter {
    ctx: Arc<AppContext>,
}

impl EventRouter {
    pub fn new(ctx: Arc<AppContext>) -> Self {
        Self { ctx }
    }

    pub fn context(&self) -> &Arc<AppContext> {
        &self.ctx
    }

    /// Decode and dispatch a raw frame, echoing its `requestId`.
    ///
    /// Frames meant for other listeners produce no response. A malformed
    /// payload for a known command is answered with a `Validation` error.
    pub async fn handle(&self, frame: Value) -> Option<Response> {
        match Request::from_value(frame) {
            Ok(Some(request)) => {
                let response = self.dispatch(request.message).await?;
                Some(response.with_request_id(request.request_id))
            }
            Ok(None) => {
                debug!("ignoring frame without an event name");
                None
            }
            Err(err) => {
                warn!(error = %err, "rejecting malformed message");
                Some(Response::failure(err))
            }
        }
    }

    /// Run one command. Returns `None` for messages the coordinator does not own.
    pub async fn dispatch(&self, message: InboundMessage) -> Option<Response> {
        let ctx = &self.ctx;
        let response = match message {
            InboundMessage::AddActivity(draft) => {
                Response::from_result(commands::add_activity(ctx, draft).await)
            }
            InboundMessage::RemoveActivity { id } => {
                Response::from_result(commands::remove_activity(ctx, id).await)
            }
            InboundMessage::RemoveActivities => {
                Response::from_result(commands::remove_activities(ctx).await)
            }
            InboundMessage::UpdateActivity { id, title } => {
                Response::from_result(commands::update_activity(ctx, id, title).await)
            }
            InboundMessage::GetActivities => {
                Response::from_result(commands::get_activities(ctx).await)
            }
            InboundMessage::AddMission { mission_name, mission_time } => Response::from_result(
                commands::add_mission(ctx, &mission_name, &mission_time).await,
            ),
            InboundMessage::StartMission => {
                Response::from_result(commands::start_mission(ctx).await)
            }
            InboundMessage::EndMission => Response::from_result(commands::end_mission(ctx).await),
            InboundMessage::GetCurrentMission => {
                Response::from_result(commands::get_current_mission(ctx).await)
            }
            InboundMessage::GetMissions => {
                Response::from_result(commands::get_missions(ctx).await)
            }
            InboundMessage::AddUrlPermission { url } => {
                Response::from_result(commands::add_url_permission(ctx, &url).await)
            }
            InboundMessage::GetUrlPermissions => {
                Response::from_result(commands::get_url_permissions(ctx).await)
            }
            InboundMessage::RemoveUrlPermission { id } => {
                Response::from_result(commands::remove_url_permission(ctx, id).await)
            }
            InboundMessage::GetUrlPermission { url } => {
                Response::from_result(commands::get_url_permission(ctx, &url).await)
            }
            InboundMessage::TabUpdated { url } => {
                ctx.tabs.update(url);
                return None;
            }
            message @ (InboundMessage::ScrollIntoView { .. } | InboundMessage::Unknown) => {
                debug!(command = message.command_name(), "message owned by another listener");
                return None;
            }
        };
        Some(response)
    }
}
