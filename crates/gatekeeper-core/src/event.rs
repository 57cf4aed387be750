// ABOUTME: Notification events pushed to every tracked admin session when the registry changes.
// ABOUTME: Serialized as {"event": <name>, "data": <payload>} frames on the real-time channel.

use serde::{Deserialize, Serialize};

use crate::model::{AccessRequest, ClientKey};

/// A registry change broadcast to admin sessions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum Notification {
    NewRequest(AccessRequest),
    RequestApproved(ClientKey),
    RequestDeclined(ClientKey),
}

impl Notification {
    /// The event name as it appears on the wire.
    pub fn name(&self) -> &'static str {
        match self {
            Notification::NewRequest(_) => "new-request",
            Notification::RequestApproved(_) => "request-approved",
            Notification::RequestDeclined(_) => "request-declined",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_names_match_serde_tags() {
        let notes = [
            Notification::NewRequest(AccessRequest::new(ClientKey::from("1.2.3.4"), None)),
            Notification::RequestApproved(ClientKey::from("1.2.3.4")),
            Notification::RequestDeclined(ClientKey::from("1.2.3.4")),
        ];

        for note in notes {
            let json = serde_json::to_value(&note).unwrap();
            assert_eq!(json["event"], note.name());
        }
    }

    #[test]
    fn approved_carries_bare_client_key() {
        let json =
            serde_json::to_value(Notification::RequestApproved(ClientKey::from("1.2.3.4"))).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "event": "request-approved", "data": "1.2.3.4" })
        );
    }

    #[test]
    fn new_request_carries_full_request() {
        let req = AccessRequest::new(ClientKey::from("1.2.3.4"), Some("ua".to_string()));
        let json = serde_json::to_value(Notification::NewRequest(req.clone())).unwrap();

        assert_eq!(json["event"], "new-request");
        assert_eq!(json["data"]["id"], req.id.to_string());
        assert_eq!(json["data"]["ip"], "1.2.3.4");
    }
}
