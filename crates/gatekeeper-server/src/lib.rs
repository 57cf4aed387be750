// ABOUTME: HTTP server for gatekeeper, providing the gate endpoint, admin API, and real-time admin channel.
// ABOUTME: Uses Axum with a shared registry actor handle for state and notification fan-out.

pub mod api;
pub mod app_state;
pub mod auth;
pub mod client;
pub mod config;
pub mod realtime;
pub mod routes;
pub mod web;

pub use app_state::{AppState, SharedState};
pub use config::{ConfigError, GatekeeperConfig};
pub use routes::create_router;

#[cfg(test)]
pub(crate) mod testing;
