use crate::{Admission, ConnectionId, Envelope, Member, Removal};

use tokio::sync::oneshot;

/// Commands processed, in arrival order, by a room's event loop
#[derive(Debug)]
pub enum RoomCommand {
    Admit {
        member: Member,
        reply: oneshot::Sender<Admission>,
    },
    Remove {
        connection_id: ConnectionId,
        reply: Option<oneshot::Sender<Removal>>,
    },
    Broadcast {
        /// Sending member; `None` for server-originated envelopes
        origin: Option<ConnectionId>,
        envelope: Envelope,
    },
}
