// ABOUTME: API module containing all HTTP handler functions for the gatekeeper REST API.
// ABOUTME: Organized into sub-modules for the client gate check and admin operations.

pub mod access;
pub mod admin;
pub mod error;

pub use error::ApiError;
