// ABOUTME: WebSocket real-time channel for admin sessions.
// ABOUTME: Sockets become tracked sessions after admin-join with the secret, then receive a snapshot and live events.

use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::Response;
use futures::stream::{SplitSink, SplitStream, Stream, StreamExt};
use futures::SinkExt;
use gatekeeper_core::{AccessRequest, AdminSession, ClientKey, Notification, RegistryHandle};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;

use crate::app_state::SharedState;

/// Frames sent from the server to an admin session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ServerMessage {
    InitialRequests(Vec<AccessRequest>),
    NewRequest(AccessRequest),
    RequestApproved(ClientKey),
    RequestDeclined(ClientKey),
}

impl From<Notification> for ServerMessage {
    fn from(note: Notification) -> Self {
        match note {
            Notification::NewRequest(req) => ServerMessage::NewRequest(req),
            Notification::RequestApproved(key) => ServerMessage::RequestApproved(key),
            Notification::RequestDeclined(key) => ServerMessage::RequestDeclined(key),
        }
    }
}

/// Frames a client may send. Anything else is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ClientMessage {
    AdminJoin(String),
}

/// One item pulled from an admin session's broadcast subscription.
#[derive(Debug, Clone, PartialEq, Eq)]
enum SessionFrame {
    /// A serialized notification ready to send.
    Event(String),
    /// The session fell behind and lost events; it needs a fresh snapshot.
    Resync,
}

/// Convert a broadcast receiver into a stream of JSON text frames.
fn frames_from_receiver(
    rx: broadcast::Receiver<Notification>,
) -> impl Stream<Item = SessionFrame> {
    BroadcastStream::new(rx).filter_map(|result| async move {
        match result {
            Ok(note) => serde_json::to_string(&ServerMessage::from(note))
                .ok()
                .map(SessionFrame::Event),
            Err(BroadcastStreamRecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "admin session lagged, resending snapshot");
                Some(SessionFrame::Resync)
            }
        }
    })
}

fn initial_frame(requests: Vec<AccessRequest>) -> Result<String, axum::Error> {
    serde_json::to_string(&ServerMessage::InitialRequests(requests)).map_err(axum::Error::new)
}

/// GET /ws - Upgrade to the real-time admin channel.
pub async fn ws_handler(State(state): State<SharedState>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: SharedState) {
    tracing::debug!("realtime client connected");
    let (sink, mut stream) = socket.split();

    let Some(session) = await_admin_join(&state, &mut stream).await else {
        tracing::debug!("realtime client disconnected");
        return;
    };

    let session_id = session.id;
    if let Err(e) = run_admin_session(&state.registry, session, sink, stream).await {
        tracing::debug!(session = %session_id, "admin socket closed with error: {}", e);
    }

    if let Err(e) = state.registry.leave_admin(session_id).await {
        tracing::error!(session = %session_id, "failed to untrack admin session: {}", e);
    }
}

/// Read frames until a valid admin-join arrives. Wrong secrets are
/// ignored silently. Returns None if the socket closes first.
async fn await_admin_join(
    state: &SharedState,
    stream: &mut SplitStream<WebSocket>,
) -> Option<AdminSession> {
    while let Some(msg) = stream.next().await {
        let text = match msg {
            Ok(Message::Text(text)) => text,
            Ok(Message::Close(_)) => return None,
            Ok(_) => continue,
            Err(e) => {
                tracing::debug!("realtime socket error before join: {}", e);
                return None;
            }
        };

        match serde_json::from_str::<ClientMessage>(text.as_str()) {
            Ok(ClientMessage::AdminJoin(secret)) => {
                if !state.admin_secret.verify(&secret) {
                    tracing::warn!("admin join rejected: bad secret");
                    continue;
                }
                match state.registry.join_admin().await {
                    Ok(session) => return Some(session),
                    Err(e) => {
                        tracing::error!("failed to register admin session: {}", e);
                        return None;
                    }
                }
            }
            Err(e) => {
                tracing::debug!("ignoring unrecognized realtime frame: {}", e);
            }
        }
    }
    None
}

/// Deliver the join snapshot, then pump broadcasts to the socket until
/// either side goes away. A lagged session gets a fresh `initial-requests`.
async fn run_admin_session(
    registry: &RegistryHandle,
    session: AdminSession,
    mut sink: SplitSink<WebSocket, Message>,
    mut stream: SplitStream<WebSocket>,
) -> Result<(), axum::Error> {
    sink.send(Message::Text(initial_frame(session.snapshot)?.into()))
        .await?;

    let mut frames = Box::pin(frames_from_receiver(session.events));

    loop {
        tokio::select! {
            frame = frames.next() => {
                match frame {
                    Some(SessionFrame::Event(frame)) => {
                        sink.send(Message::Text(frame.into())).await?
                    }
                    Some(SessionFrame::Resync) => {
                        let pending = registry.list_pending().await.map_err(axum::Error::new)?;
                        sink.send(Message::Text(initial_frame(pending)?.into())).await?
                    }
                    None => break,
                }
            }
            msg = stream.next() => {
                match msg {
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(_)) => {}
                    Some(Err(e)) => return Err(e),
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use gatekeeper_core::{AccessRegistry, spawn};
    use std::time::Duration;

    #[test]
    fn admin_join_frame_parses() {
        let msg: ClientMessage =
            serde_json::from_str(r#"{"event":"admin-join","data":"s3cret"}"#).unwrap();
        assert_eq!(msg, ClientMessage::AdminJoin("s3cret".to_string()));
    }

    #[test]
    fn unknown_client_frame_is_rejected() {
        let result = serde_json::from_str::<ClientMessage>(r#"{"event":"delete-all","data":1}"#);
        assert!(result.is_err());
    }

    #[test]
    fn initial_requests_frame_shape() {
        let req = AccessRequest::new(ClientKey::from("1.2.3.4"), None);
        let json = serde_json::to_value(ServerMessage::InitialRequests(vec![req.clone()])).unwrap();

        assert_eq!(json["event"], "initial-requests");
        assert_eq!(json["data"][0]["id"], req.id.to_string());
    }

    #[test]
    fn notifications_keep_their_event_names() {
        let note = Notification::RequestDeclined(ClientKey::from("5.6.7.8"));
        let name = note.name();
        let json = serde_json::to_value(ServerMessage::from(note)).unwrap();

        assert_eq!(json["event"], name);
        assert_eq!(json["data"], "5.6.7.8");
    }

    #[tokio::test]
    async fn frames_follow_registry_broadcasts() {
        let handle = spawn(AccessRegistry::new());
        let session = handle.join_admin().await.unwrap();
        let mut frames = Box::pin(frames_from_receiver(session.events));

        handle
            .check_access(ClientKey::from("1.2.3.4"), None)
            .await
            .unwrap();
        handle.approve(ClientKey::from("1.2.3.4")).await.unwrap();

        let first = tokio::time::timeout(Duration::from_secs(2), frames.next())
            .await
            .expect("should receive frame within timeout")
            .expect("stream should have an item");
        let second = tokio::time::timeout(Duration::from_secs(2), frames.next())
            .await
            .expect("should receive frame within timeout")
            .expect("stream should have an item");

        let (SessionFrame::Event(first), SessionFrame::Event(second)) = (first, second) else {
            panic!("expected two event frames");
        };
        let first: ServerMessage = serde_json::from_str(&first).unwrap();
        let second: ServerMessage = serde_json::from_str(&second).unwrap();
        assert!(matches!(first, ServerMessage::NewRequest(ref r) if r.ip.as_str() == "1.2.3.4"));
        assert_eq!(second, ServerMessage::RequestApproved(ClientKey::from("1.2.3.4")));
    }

    #[tokio::test]
    async fn lagged_session_is_told_to_resync() {
        let handle = spawn(AccessRegistry::new());
        let session = handle.join_admin().await.unwrap();
        let mut frames = Box::pin(frames_from_receiver(session.events));

        // More new requests than the broadcast buffer holds, none read yet.
        for i in 0..300u32 {
            let ip = format!("10.0.{}.{}", i / 256, i % 256);
            handle
                .check_access(ClientKey::from(ip), None)
                .await
                .unwrap();
        }

        let first = tokio::time::timeout(Duration::from_secs(2), frames.next())
            .await
            .expect("should receive frame within timeout")
            .expect("stream should have an item");
        assert_eq!(first, SessionFrame::Resync);

        let mut events = 0;
        while let Ok(Some(frame)) =
            tokio::time::timeout(Duration::from_millis(200), frames.next()).await
        {
            assert!(matches!(frame, SessionFrame::Event(_)));
            events += 1;
        }
        assert!(events < 300, "some events should have been dropped");

        // The resync snapshot covers everything the lagged session missed.
        let snapshot = initial_frame(handle.list_pending().await.unwrap()).unwrap();
        let msg: ServerMessage = serde_json::from_str(&snapshot).unwrap();
        let ServerMessage::InitialRequests(requests) = msg else {
            panic!("expected initial-requests frame");
        };
        assert_eq!(requests.len(), 300);
        assert_eq!(requests[0].ip.as_str(), "10.0.0.0");
        assert_eq!(requests[299].ip.as_str(), "10.0.1.43");
    }
}
