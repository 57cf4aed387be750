// ABOUTME: Admin API handlers for approving or declining clients and listing pending requests.
// ABOUTME: The admin secret is checked before the action verb is examined or any state changes.

use axum::Json;
use axum::extract::State;
use gatekeeper_core::{AccessRequest, ClientKey};
use serde::{Deserialize, Serialize};

use crate::api::ApiError;
use crate::app_state::SharedState;

/// Request body for an admin decision.
#[derive(Debug, Deserialize)]
pub struct AdminActionRequest {
    pub action: String,
    pub ip: ClientKey,
    pub password: String,
}

/// Response body for a successful admin decision.
#[derive(Debug, Serialize)]
pub struct AdminActionResponse {
    pub success: bool,
}

/// The decisions an administrator can make on a client key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminAction {
    Approve,
    Decline,
}

impl AdminAction {
    pub fn parse(verb: &str) -> Option<Self> {
        match verb {
            "approve" => Some(AdminAction::Approve),
            "decline" => Some(AdminAction::Decline),
            _ => None,
        }
    }
}

/// POST /api/admin/action - Approve or decline a client key.
pub async fn admin_action(
    State(state): State<SharedState>,
    Json(req): Json<AdminActionRequest>,
) -> Result<Json<AdminActionResponse>, ApiError> {
    if !state.admin_secret.verify(&req.password) {
        tracing::warn!(client = %req.ip, "admin action rejected: bad password");
        return Err(ApiError::Unauthorized);
    }

    let action = AdminAction::parse(&req.action).ok_or_else(|| {
        tracing::warn!(action = %req.action, "admin action rejected: unknown verb");
        ApiError::InvalidAction(req.action.clone())
    })?;

    match action {
        AdminAction::Approve => state.registry.approve(req.ip).await?,
        AdminAction::Decline => state.registry.decline(req.ip).await?,
    }

    Ok(Json(AdminActionResponse { success: true }))
}

/// GET /api/admin/requests - Snapshot of pending requests in arrival order.
pub async fn list_requests(
    State(state): State<SharedState>,
) -> Result<Json<Vec<AccessRequest>>, ApiError> {
    Ok(Json(state.registry.list_pending().await?))
}
