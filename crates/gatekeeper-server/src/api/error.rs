// ABOUTME: Error type shared by the API handlers, rendered as {"error": ...} JSON bodies.
// ABOUTME: Maps authorization, validation, and registry failures onto HTTP status codes.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use gatekeeper_core::RegistryError;
use thiserror::Error;

/// Failures surfaced by the HTTP API.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid admin password")]
    Unauthorized,

    #[error("Invalid action")]
    InvalidAction(String),

    #[error("registry unavailable")]
    Registry(#[from] RegistryError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::InvalidAction(_) => StatusCode::BAD_REQUEST,
            ApiError::Registry(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Registry(ref e) = self {
            tracing::error!("registry call failed: {}", e);
        }
        (
            self.status(),
            Json(serde_json::json!({ "error": self.to_string() })),
        )
            .into_response()
    }
}
