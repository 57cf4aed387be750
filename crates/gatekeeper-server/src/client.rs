// ABOUTME: Derives the client key and descriptor for an inbound HTTP request.
// ABOUTME: Uses the peer address, or the first X-Forwarded-For hop when the proxy is trusted.

use std::net::SocketAddr;

use axum::http::HeaderMap;
use axum::http::header::USER_AGENT;
use gatekeeper_core::ClientKey;

/// Resolve the client key for a request. The raw network address is a
/// weak identity (shared behind NAT, spoofable through trusted headers).
pub fn client_key(peer: SocketAddr, headers: &HeaderMap, trust_forwarded: bool) -> ClientKey {
    if trust_forwarded {
        let forwarded = headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|hop| !hop.is_empty());

        if let Some(hop) = forwarded {
            return ClientKey::from(hop);
        }
    }

    ClientKey::from(peer.ip())
}

/// The client-supplied descriptor stored on new access requests.
pub fn descriptor(headers: &HeaderMap) -> Option<String> {
    headers
        .get(USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn peer() -> SocketAddr {
        SocketAddr::from(([1, 2, 3, 4], 5555))
    }

    #[test]
    fn peer_ip_is_used_by_default() {
        let key = client_key(peer(), &HeaderMap::new(), false);
        assert_eq!(key.as_str(), "1.2.3.4");
    }

    #[test]
    fn forwarded_header_ignored_when_untrusted() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static("9.9.9.9"));

        let key = client_key(peer(), &headers, false);
        assert_eq!(key.as_str(), "1.2.3.4");
    }

    #[test]
    fn first_forwarded_hop_used_when_trusted() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static(" 9.9.9.9 , 10.0.0.1"),
        );

        let key = client_key(peer(), &headers, true);
        assert_eq!(key.as_str(), "9.9.9.9");
    }

    #[test]
    fn empty_forwarded_header_falls_back_to_peer() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static(""));

        let key = client_key(peer(), &headers, true);
        assert_eq!(key.as_str(), "1.2.3.4");
    }

    #[test]
    fn descriptor_reads_user_agent() {
        let mut headers = HeaderMap::new();
        assert_eq!(descriptor(&headers), None);

        headers.insert(USER_AGENT, HeaderValue::from_static("Mozilla/5.0"));
        assert_eq!(descriptor(&headers).as_deref(), Some("Mozilla/5.0"));
    }
}
