use crate::{BroadcastMessage, ConnectionId, MemberIdentity};

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;

/// Room-side handle of one connection.
///
/// Holds the only sender of the connection's outbound queue: whoever owns the
/// `Member` owns the queue, and dropping it closes the queue so the write
/// loop flushes and shuts the transport.
#[derive(Debug)]
pub struct Member {
    pub connection_id: ConnectionId,
    pub identity: MemberIdentity,
    pub connected_at: DateTime<Utc>,
    sender: mpsc::Sender<BroadcastMessage>,
}

impl Member {
    pub fn new(
        connection_id: ConnectionId,
        identity: MemberIdentity,
        sender: mpsc::Sender<BroadcastMessage>,
    ) -> Self {
        Self {
            connection_id,
            identity,
            connected_at: Utc::now(),
            sender,
        }
    }

    /// Non-blocking enqueue onto the outbound queue
    pub fn try_deliver(
        &self,
        message: BroadcastMessage,
    ) -> Result<(), mpsc::error::TrySendError<BroadcastMessage>> {
        self.sender.try_send(message)
    }
}
