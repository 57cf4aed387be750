// ABOUTME: Core library for gatekeeper, containing the access registry and its notification events.
// ABOUTME: The registry actor serializes every mutation together with its broadcast to admin sessions.

pub mod actor;
pub mod event;
pub mod model;
pub mod registry;

pub use actor::{AccessOutcome, AdminSession, RegistryError, RegistryHandle, RegistryStats, spawn};
pub use event::Notification;
pub use model::{AccessRequest, ApprovedEntry, ClientKey, RequestStatus};
pub use registry::AccessRegistry;
