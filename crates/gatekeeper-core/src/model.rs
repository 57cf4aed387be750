// ABOUTME: Defines the client key, pending access request, and approved entry types.
// ABOUTME: Wire field names match what the admin panel reads (id, ip, timestamp, userAgent, status).

use std::fmt;
use std::net::IpAddr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ulid::Ulid;

/// The network address used to correlate a client across requests.
/// Serialized as a bare string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientKey(String);

impl ClientKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<IpAddr> for ClientKey {
    fn from(ip: IpAddr) -> Self {
        Self(ip.to_string())
    }
}

impl From<String> for ClientKey {
    fn from(key: String) -> Self {
        Self(key)
    }
}

impl From<&str> for ClientKey {
    fn from(key: &str) -> Self {
        Self(key.to_string())
    }
}

impl fmt::Display for ClientKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lifecycle status of an access request. Resolved requests are removed
/// from the registry rather than transitioned, so only `Pending` exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
}

/// A client waiting for an administrator to approve or decline it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessRequest {
    pub id: Ulid,
    pub ip: ClientKey,
    pub timestamp: DateTime<Utc>,
    /// Client-supplied descriptor, normally the User-Agent header.
    pub user_agent: Option<String>,
    pub status: RequestStatus,
}

impl AccessRequest {
    /// Create a pending request with a fresh ULID, stamped with the current time.
    pub fn new(ip: ClientKey, user_agent: Option<String>) -> Self {
        Self {
            id: Ulid::new(),
            ip,
            timestamp: Utc::now(),
            user_agent,
            status: RequestStatus::Pending,
        }
    }
}

/// A client key granted access for the lifetime of the process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovedEntry {
    pub ip: ClientKey,
    pub approved_at: DateTime<Utc>,
}

impl ApprovedEntry {
    pub fn new(ip: ClientKey) -> Self {
        Self {
            ip,
            approved_at: Utc::now(),
        }
    }
}
