// ABOUTME: Shared helpers for router-level unit tests.
// ABOUTME: Builds isolated states and routers with a mocked peer address.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::extract::connect_info::MockConnectInfo;

use crate::app_state::{AppState, SharedState};
use crate::auth::AdminSecret;
use crate::routes::create_router;

pub const TEST_SECRET: &str = "test-secret-123";

/// A fresh state with its own empty registry actor.
pub fn test_state() -> SharedState {
    Arc::new(AppState::with_empty_registry(AdminSecret::new(TEST_SECRET)))
}

/// Router whose requests all appear to come from `ip`.
pub fn app_as(state: &SharedState, ip: [u8; 4]) -> Router {
    create_router(Arc::clone(state), None).layer(MockConnectInfo(SocketAddr::from((ip, 40000))))
}

/// Helper to extract JSON body from a response.
pub async fn json_body(resp: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}
