// ABOUTME: Route definitions for the gatekeeper HTTP server.
// ABOUTME: Assembles the pages, gate and admin API, real-time channel, and static fallback into one Router.

use std::path::PathBuf;

use axum::Router;
use axum::extract::State;
use axum::routing::{get, post};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::api;
use crate::api::ApiError;
use crate::app_state::SharedState;
use crate::realtime;
use crate::web;

/// Build the complete Axum router with all routes and shared state.
/// Unmatched paths are served from `public_dir` when one is given.
pub fn create_router(state: SharedState, public_dir: Option<PathBuf>) -> Router {
    let mut router = Router::new()
        .route("/", get(web::index))
        .route("/admin", get(web::admin))
        .route("/health", get(health))
        .route("/api/check-access", get(api::access::check_access))
        .route("/api/admin/action", post(api::admin::admin_action))
        .route("/api/admin/requests", get(api::admin::list_requests))
        .route("/ws", get(realtime::ws_handler));

    if let Some(dir) = public_dir {
        router = router.fallback_service(ServeDir::new(dir));
    }

    router.layer(TraceLayer::new_for_http()).with_state(state)
}

/// Health check handler. Returns 200 OK with registry counters.
async fn health(
    State(state): State<SharedState>,
) -> Result<axum::Json<serde_json::Value>, ApiError> {
    let stats = state.registry.stats().await?;
    Ok(axum::Json(serde_json::json!({
        "status": "ok",
        "pending": stats.pending,
        "approved": stats.approved,
        "admin_sessions": stats.admin_sessions,
    })))
}
