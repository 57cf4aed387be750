// ABOUTME: Gate endpoint deciding whether the calling client is approved.
// ABOUTME: Unapproved clients get a pending access request, created and broadcast on first sight.

use std::net::SocketAddr;

use axum::Json;
use axum::extract::{ConnectInfo, State};
use axum::http::HeaderMap;
use serde::Serialize;

use crate::api::ApiError;
use crate::app_state::SharedState;
use crate::client;

/// Response body for the gate check. Pending and first-seen clients look
/// the same from the outside.
#[derive(Debug, Serialize)]
pub struct CheckAccessResponse {
    pub approved: bool,
}

/// GET /api/check-access - Report whether the caller's client key is approved.
pub async fn check_access(
    State(state): State<SharedState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
) -> Result<Json<CheckAccessResponse>, ApiError> {
    let key = client::client_key(peer, &headers, state.trust_forwarded);
    let outcome = state
        .registry
        .check_access(key, client::descriptor(&headers))
        .await?;

    Ok(Json(CheckAccessResponse {
        approved: outcome.is_approved(),
    }))
}
