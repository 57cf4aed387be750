// ABOUTME: Async actor owning the access registry and the admin notification fan-out.
// ABOUTME: Provides RegistryHandle for gate checks, admin decisions, snapshots, and session tracking.

use std::collections::HashSet;

use serde::Serialize;
use thiserror::Error;
use tokio::sync::{broadcast, mpsc, oneshot};
use ulid::Ulid;

use crate::event::Notification;
use crate::model::{AccessRequest, ClientKey};
use crate::registry::AccessRegistry;

/// Errors that can occur when talking to the registry actor.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("registry actor channel closed")]
    ChannelClosed,
}

/// Result of a gate check for one client key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessOutcome {
    Approved,
    Pending { request: AccessRequest, is_new: bool },
}

impl AccessOutcome {
    pub fn is_approved(&self) -> bool {
        matches!(self, AccessOutcome::Approved)
    }
}

/// A freshly registered admin session: its id, the pending snapshot taken
/// at join time, and the receiver for every broadcast after that snapshot.
#[derive(Debug)]
pub struct AdminSession {
    pub id: Ulid,
    pub snapshot: Vec<AccessRequest>,
    pub events: broadcast::Receiver<Notification>,
}

/// Counters exposed on the health endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RegistryStats {
    pub pending: usize,
    pub approved: usize,
    pub admin_sessions: usize,
}

enum Command {
    CheckAccess {
        key: ClientKey,
        descriptor: Option<String>,
        reply: oneshot::Sender<AccessOutcome>,
    },
    Approve {
        key: ClientKey,
        reply: oneshot::Sender<()>,
    },
    Decline {
        key: ClientKey,
        reply: oneshot::Sender<()>,
    },
    ListPending {
        reply: oneshot::Sender<Vec<AccessRequest>>,
    },
    JoinAdmin {
        reply: oneshot::Sender<AdminSession>,
    },
    LeaveAdmin {
        session_id: Ulid,
        reply: oneshot::Sender<()>,
    },
    Stats {
        reply: oneshot::Sender<RegistryStats>,
    },
}

/// Cloneable handle for interacting with the registry actor. Every
/// operation is processed in arrival order, one at a time.
#[derive(Clone)]
pub struct RegistryHandle {
    cmd_tx: mpsc::Sender<Command>,
}

impl RegistryHandle {
    async fn request<T>(
        &self,
        make: impl FnOnce(oneshot::Sender<T>) -> Command,
    ) -> Result<T, RegistryError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(make(tx))
            .await
            .map_err(|_| RegistryError::ChannelClosed)?;
        rx.await.map_err(|_| RegistryError::ChannelClosed)
    }

    /// Gate check: approved keys pass, everyone else gets a pending request
    /// (created and broadcast as `new-request` on first sight).
    pub async fn check_access(
        &self,
        key: ClientKey,
        descriptor: Option<String>,
    ) -> Result<AccessOutcome, RegistryError> {
        self.request(|reply| Command::CheckAccess {
            key,
            descriptor,
            reply,
        })
        .await
    }

    /// Approve `key` and broadcast `request-approved`.
    pub async fn approve(&self, key: ClientKey) -> Result<(), RegistryError> {
        self.request(|reply| Command::Approve { key, reply }).await
    }

    /// Decline `key` and broadcast `request-declined`.
    pub async fn decline(&self, key: ClientKey) -> Result<(), RegistryError> {
        self.request(|reply| Command::Decline { key, reply }).await
    }

    pub async fn list_pending(&self) -> Result<Vec<AccessRequest>, RegistryError> {
        self.request(|reply| Command::ListPending { reply }).await
    }

    /// Register a new admin session. The snapshot and the subscription are
    /// taken in the same step, so no broadcast falls between them.
    pub async fn join_admin(&self) -> Result<AdminSession, RegistryError> {
        self.request(|reply| Command::JoinAdmin { reply }).await
    }

    /// Stop tracking an admin session. Unknown ids are ignored.
    pub async fn leave_admin(&self, session_id: Ulid) -> Result<(), RegistryError> {
        self.request(|reply| Command::LeaveAdmin { session_id, reply })
            .await
    }

    pub async fn stats(&self) -> Result<RegistryStats, RegistryError> {
        self.request(|reply| Command::Stats { reply }).await
    }
}

/// Spawn the registry actor and return the handle for interacting with it.
pub fn spawn(registry: AccessRegistry) -> RegistryHandle {
    let (cmd_tx, cmd_rx) = mpsc::channel::<Command>(64);
    let (event_tx, _) = broadcast::channel::<Notification>(256);

    let actor = RegistryActor {
        registry,
        cmd_rx,
        event_tx,
        sessions: HashSet::new(),
    };

    tokio::spawn(actor.run());

    RegistryHandle { cmd_tx }
}

/// The internal actor. Each command's mutation and broadcast complete
/// before the next command is read.
struct RegistryActor {
    registry: AccessRegistry,
    cmd_rx: mpsc::Receiver<Command>,
    event_tx: broadcast::Sender<Notification>,
    sessions: HashSet<Ulid>,
}

impl RegistryActor {
    async fn run(mut self) {
        while let Some(cmd) = self.cmd_rx.recv().await {
            // Reply errors are ignored; the caller may have gone away.
            match cmd {
                Command::CheckAccess {
                    key,
                    descriptor,
                    reply,
                } => {
                    let _ = reply.send(self.check_access(key, descriptor));
                }
                Command::Approve { key, reply } => {
                    self.registry.approve(&key);
                    tracing::info!(client = %key, "access approved");
                    self.broadcast(Notification::RequestApproved(key));
                    let _ = reply.send(());
                }
                Command::Decline { key, reply } => {
                    self.registry.decline(&key);
                    tracing::info!(client = %key, "access declined");
                    self.broadcast(Notification::RequestDeclined(key));
                    let _ = reply.send(());
                }
                Command::ListPending { reply } => {
                    let _ = reply.send(self.registry.list_pending());
                }
                Command::JoinAdmin { reply } => {
                    let session = AdminSession {
                        id: Ulid::new(),
                        snapshot: self.registry.list_pending(),
                        events: self.event_tx.subscribe(),
                    };
                    let id = session.id;
                    if reply.send(session).is_ok() {
                        self.sessions.insert(id);
                        tracing::info!(session = %id, sessions = self.sessions.len(), "admin joined");
                    }
                }
                Command::LeaveAdmin { session_id, reply } => {
                    if self.sessions.remove(&session_id) {
                        tracing::info!(session = %session_id, sessions = self.sessions.len(), "admin left");
                    }
                    let _ = reply.send(());
                }
                Command::Stats { reply } => {
                    let _ = reply.send(RegistryStats {
                        pending: self.registry.pending_count(),
                        approved: self.registry.approved_count(),
                        admin_sessions: self.sessions.len(),
                    });
                }
            }
        }
    }

    fn check_access(&mut self, key: ClientKey, descriptor: Option<String>) -> AccessOutcome {
        if self.registry.is_approved(&key) {
            return AccessOutcome::Approved;
        }

        let (request, is_new) = self.registry.get_or_create_pending(&key, descriptor);
        if is_new {
            tracing::info!(client = %key, request_id = %request.id, "new access request");
            self.broadcast(Notification::NewRequest(request.clone()));
        }
        AccessOutcome::Pending { request, is_new }
    }

    fn broadcast(&self, note: Notification) {
        // No subscribers is fine: fan-out is best-effort.
        let _ = self.event_tx.send(note);
    }
}
