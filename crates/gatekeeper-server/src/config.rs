// ABOUTME: Configuration loading and validation for the gatekeeper server.
// ABOUTME: Reads environment variables and refuses to start without an admin secret.

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("GATEKEEPER_ADMIN_SECRET is not set; refusing to start without an admin secret")]
    MissingSecret,

    #[error("PORT is not a valid port number: {0}")]
    InvalidPort(String),

    #[error("GATEKEEPER_HOST is not a valid IP address: {0}")]
    InvalidHost(String),
}

/// Server configuration loaded from environment variables.
#[derive(Clone)]
pub struct GatekeeperConfig {
    pub admin_secret: String,
    pub bind: SocketAddr,
    pub public_dir: PathBuf,
    pub trust_forwarded: bool,
}

impl std::fmt::Debug for GatekeeperConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatekeeperConfig")
            .field("admin_secret", &"<redacted>")
            .field("bind", &self.bind)
            .field("public_dir", &self.public_dir)
            .field("trust_forwarded", &self.trust_forwarded)
            .finish()
    }
}

impl GatekeeperConfig {
    /// Load configuration from environment variables with sensible defaults.
    ///
    /// Environment variables:
    /// - GATEKEEPER_ADMIN_SECRET: shared admin secret (required)
    /// - PORT: listening port (default: 3000)
    /// - GATEKEEPER_HOST: listening interface (default: 0.0.0.0)
    /// - GATEKEEPER_PUBLIC_DIR: static asset directory (default: public)
    /// - GATEKEEPER_TRUST_FORWARDED: take the client key from X-Forwarded-For (default: false)
    pub fn from_env() -> Result<Self, ConfigError> {
        let admin_secret = std::env::var("GATEKEEPER_ADMIN_SECRET")
            .ok()
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::MissingSecret)?;

        let port_str = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
        let port: u16 = port_str
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidPort(port_str.clone()))?;

        let host_str = std::env::var("GATEKEEPER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let host: IpAddr = host_str
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidHost(host_str.clone()))?;

        let public_dir = std::env::var("GATEKEEPER_PUBLIC_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("public"));

        let trust_forwarded = std::env::var("GATEKEEPER_TRUST_FORWARDED")
            .map(|v| v == "true" || v == "1" || v == "yes")
            .unwrap_or(false);

        Ok(Self {
            admin_secret,
            bind: SocketAddr::new(host, port),
            public_dir,
            trust_forwarded,
        })
    }
}
