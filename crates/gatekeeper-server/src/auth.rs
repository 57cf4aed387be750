// ABOUTME: Shared admin secret used to authorize admin actions and real-time session registration.
// ABOUTME: Comparison is constant-time and the secret never appears in Debug output or logs.

use std::sync::Arc;

use subtle::ConstantTimeEq;

/// The process-wide admin secret, injected at startup.
#[derive(Clone)]
pub struct AdminSecret {
    secret: Arc<str>,
}

impl AdminSecret {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: Arc::from(secret.into()),
        }
    }

    /// Check a caller-supplied secret in constant time.
    pub fn verify(&self, supplied: &str) -> bool {
        self.secret.as_bytes().ct_eq(supplied.as_bytes()).into()
    }
}

impl std::fmt::Debug for AdminSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AdminSecret(<redacted>)")
    }
}
