use crate::{
    Admission, ConnectionId, Envelope, Member, Removal, Result as WsErrorResult, RoomCommand,
    WsError,
};

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::{Notify, mpsc, oneshot};

/// State a room publishes to the outside world.
///
/// Only the room loop writes `members`; everyone else reads a snapshot.
#[derive(Debug, Default)]
pub(crate) struct RoomShared {
    members: AtomicUsize,
    pending_admissions: AtomicUsize,
    stop: Notify,
}

impl RoomShared {
    pub(crate) fn publish_members(&self, count: usize) {
        self.members.store(count, Ordering::SeqCst);
    }

    pub(crate) fn release_admission(&self) {
        let _ = self
            .pending_admissions
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1));
    }

    pub(crate) fn stop_signal(&self) -> &Notify {
        &self.stop
    }
}

/// Cloneable, enqueue-only interface to a running room
#[derive(Debug, Clone)]
pub struct RoomHandle {
    project_id: Arc<str>,
    max_members: usize,
    commands: mpsc::Sender<RoomCommand>,
    shared: Arc<RoomShared>,
}

impl RoomHandle {
    pub(crate) fn new(
        project_id: Arc<str>,
        max_members: usize,
        commands: mpsc::Sender<RoomCommand>,
        shared: Arc<RoomShared>,
    ) -> Self {
        Self {
            project_id,
            max_members,
            commands,
            shared,
        }
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    pub fn max_members(&self) -> usize {
        self.max_members
    }

    /// Member count as last published by the room loop.
    ///
    /// A snapshot: an admission already queued may change it at any moment.
    pub fn member_count(&self) -> usize {
        self.shared.members.load(Ordering::SeqCst)
    }

    /// Best-effort capacity check; the room loop makes the binding decision
    pub fn is_full(&self) -> bool {
        self.member_count() >= self.max_members
    }

    /// No members and no admission on its way to the loop
    pub(crate) fn is_idle(&self) -> bool {
        self.shared.pending_admissions.load(Ordering::SeqCst) == 0 && self.member_count() == 0
    }

    /// Mark an admission as in flight; the room loop releases it on receipt
    pub(crate) fn reserve_admission(&self) {
        self.shared.pending_admissions.fetch_add(1, Ordering::SeqCst);
    }

    /// Hand a member to the room and wait for its decision
    pub async fn admit(&self, member: Member) -> WsErrorResult<Admission> {
        self.reserve_admission();
        self.admit_reserved(member).await
    }

    pub(crate) async fn admit_reserved(&self, member: Member) -> WsErrorResult<Admission> {
        let (reply, decision) = oneshot::channel();

        if self
            .commands
            .send(RoomCommand::Admit { member, reply })
            .await
            .is_err()
        {
            self.shared.release_admission();
            return Err(WsError::room_closed(self.project_id.as_ref()));
        }

        decision
            .await
            .map_err(|_| WsError::room_closed(self.project_id.as_ref()))
    }

    /// Remove a connection and wait until the room has processed it.
    /// Removing a non-member is not an error.
    pub async fn remove(&self, connection_id: ConnectionId) -> WsErrorResult<Removal> {
        let (reply, outcome) = oneshot::channel();

        self.commands
            .send(RoomCommand::Remove {
                connection_id,
                reply: Some(reply),
            })
            .await
            .map_err(|_| WsError::room_closed(self.project_id.as_ref()))?;

        outcome
            .await
            .map_err(|_| WsError::room_closed(self.project_id.as_ref()))
    }

    /// Queue an envelope for fan-out to every member
    pub async fn broadcast(
        &self,
        origin: Option<ConnectionId>,
        envelope: Envelope,
    ) -> WsErrorResult<()> {
        self.commands
            .send(RoomCommand::Broadcast { origin, envelope })
            .await
            .map_err(|_| WsError::room_closed(self.project_id.as_ref()))
    }

    /// Ask the room loop to exit, closing every remaining member queue
    pub fn stop(&self) {
        self.shared.stop_signal().notify_one();
    }

    pub fn is_stopped(&self) -> bool {
        self.commands.is_closed()
    }

    /// Resolves once the room loop has exited
    pub async fn stopped(&self) {
        self.commands.closed().await;
    }
}
