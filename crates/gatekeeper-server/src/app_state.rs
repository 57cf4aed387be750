// ABOUTME: Shared application state for the gatekeeper HTTP server.
// ABOUTME: Holds the registry actor handle and the admin secret; one instance per server or test.

use std::sync::Arc;

use gatekeeper_core::{AccessRegistry, RegistryHandle};

use crate::auth::AdminSecret;

/// Shared application state accessible by all Axum handlers.
pub struct AppState {
    pub registry: RegistryHandle,
    pub admin_secret: AdminSecret,
    /// Take the client key from X-Forwarded-For instead of the peer address.
    pub trust_forwarded: bool,
}

/// Type alias for the Arc-wrapped state used with Axum's State extractor.
pub type SharedState = Arc<AppState>;

impl AppState {
    /// Create an AppState around an already running registry actor.
    pub fn new(registry: RegistryHandle, admin_secret: AdminSecret) -> Self {
        Self {
            registry,
            admin_secret,
            trust_forwarded: false,
        }
    }

    /// Spawn a fresh, empty registry actor and wrap it. Must be called
    /// from within a tokio runtime.
    pub fn with_empty_registry(admin_secret: AdminSecret) -> Self {
        Self::new(gatekeeper_core::spawn(AccessRegistry::new()), admin_secret)
    }

    pub fn trust_forwarded(mut self, trust: bool) -> Self {
        self.trust_forwarded = trust;
        self
    }
}
