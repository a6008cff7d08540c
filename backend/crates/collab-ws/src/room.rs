use crate::error_codes::ROOM_FULL;
use crate::room_handle::RoomShared;
use crate::{
    Admission, BroadcastMessage, ConnectionId, Envelope, Member, Metrics, Removal, RoomCommand,
    RoomHandle, RoomSettings, RosterEntry,
};

use std::sync::Arc;

use log::{debug, error, info, warn};
use tokio::sync::{mpsc, oneshot};

/// Single-writer state machine over one project's member set.
///
/// The member list lives inside the spawned loop and is never shared; all
/// other components talk to it through a [`RoomHandle`]. Members are kept in
/// join order, which is also the roster order in presence notifications.
pub struct Room {
    project_id: Arc<str>,
    settings: RoomSettings,
    members: Vec<Member>,
    shared: Arc<RoomShared>,
    metrics: Metrics,
}

impl Room {
    /// Start the event loop for `project_id` and return its handle
    pub fn spawn(project_id: &str, settings: RoomSettings, metrics: Metrics) -> RoomHandle {
        let project_id: Arc<str> = Arc::from(project_id);
        let (commands_tx, commands_rx) = mpsc::channel(settings.command_buffer_size.max(1));
        let shared = Arc::new(RoomShared::default());

        let handle = RoomHandle::new(
            Arc::clone(&project_id),
            settings.max_members,
            commands_tx,
            Arc::clone(&shared),
        );

        let room = Self {
            project_id,
            settings,
            members: Vec::new(),
            shared,
            metrics,
        };
        tokio::spawn(room.run(commands_rx));

        handle
    }

    async fn run(mut self, mut commands: mpsc::Receiver<RoomCommand>) {
        info!(
            "Room {} started (max {} members)",
            self.project_id, self.settings.max_members
        );

        let shared = Arc::clone(&self.shared);

        loop {
            tokio::select! {
                biased;

                _ = shared.stop_signal().notified() => {
                    debug!("Room {} received stop signal", self.project_id);
                    break;
                }

                command = commands.recv() => match command {
                    Some(command) => self.handle_command(command),
                    None => break,
                }
            }
        }

        // Dropping the members closes their outbound queues
        let remaining = self.members.len();
        self.members.clear();
        self.shared.publish_members(0);

        info!(
            "Room {} stopped ({} members disconnected)",
            self.project_id, remaining
        );
    }

    fn handle_command(&mut self, command: RoomCommand) {
        match command {
            RoomCommand::Admit { member, reply } => self.admit(member, reply),
            RoomCommand::Remove {
                connection_id,
                reply,
            } => self.remove(connection_id, reply),
            RoomCommand::Broadcast { origin, envelope } => self.broadcast(origin, envelope),
        }
    }

    fn admit(&mut self, member: Member, reply: oneshot::Sender<Admission>) {
        // Release the reservation only after the member count reflects the decision
        if self.members.len() >= self.settings.max_members {
            self.reject(member);
            self.shared.release_admission();
            let _ = reply.send(Admission::Rejected {
                max_members: self.settings.max_members,
            });
            return;
        }

        let identity = member.identity.clone();
        let connection_id = member.connection_id;
        self.members.push(member);
        self.shared.publish_members(self.members.len());
        self.shared.release_admission();
        self.metrics.member_admitted();

        let members = self.members.len();
        info!(
            "Connection {} ({}) joined room {} ({}/{} members)",
            connection_id, identity.user_id, self.project_id, members, self.settings.max_members
        );

        match Envelope::user_joined(&self.project_id, &identity, self.roster()) {
            Ok(envelope) => self.broadcast(None, envelope),
            Err(e) => error!("Failed to build user_joined for room {}: {}", self.project_id, e),
        }

        let _ = reply.send(Admission::Admitted { members });
    }

    /// Tell the candidate why and drop its queue so the transport gets closed
    fn reject(&self, member: Member) {
        warn!(
            "Room {} is full ({} members), rejecting connection {} ({})",
            self.project_id,
            self.members.len(),
            member.connection_id,
            member.identity.user_id
        );
        self.metrics.member_rejected();

        let envelope = Envelope::error(
            &member.identity,
            ROOM_FULL,
            format!("room full, max {} users", self.settings.max_members),
        );

        match BroadcastMessage::from_envelope(&envelope) {
            Ok(message) => {
                if member.try_deliver(message).is_err() {
                    debug!(
                        "Could not queue rejection for connection {}",
                        member.connection_id
                    );
                }
            }
            Err(e) => error!("Failed to serialize rejection: {}", e),
        }
    }

    fn remove(&mut self, connection_id: ConnectionId, reply: Option<oneshot::Sender<Removal>>) {
        let removed = match self
            .members
            .iter()
            .position(|m| m.connection_id == connection_id)
        {
            Some(index) => {
                let member = self.members.remove(index);
                self.shared.publish_members(self.members.len());
                let identity = member.identity.clone();
                drop(member);

                info!(
                    "Connection {} ({}) left room {} ({} members remaining)",
                    connection_id,
                    identity.user_id,
                    self.project_id,
                    self.members.len()
                );

                if !self.members.is_empty() {
                    match Envelope::user_left(&self.project_id, &identity, self.roster()) {
                        Ok(envelope) => self.broadcast(None, envelope),
                        Err(e) => {
                            error!("Failed to build user_left for room {}: {}", self.project_id, e)
                        }
                    }
                }
                true
            }
            None => {
                debug!(
                    "Connection {} is not a member of room {}, nothing to remove",
                    connection_id, self.project_id
                );
                false
            }
        };

        if let Some(reply) = reply {
            let _ = reply.send(Removal {
                removed,
                remaining: self.members.len(),
            });
        }
    }

    fn broadcast(&mut self, origin: Option<ConnectionId>, envelope: Envelope) {
        if let Some(origin) = origin
            && !self.members.iter().any(|m| m.connection_id == origin)
        {
            debug!(
                "Dropping {} from connection {}: not a member of room {}",
                envelope.kind, origin, self.project_id
            );
            return;
        }

        let message = match BroadcastMessage::from_envelope(&envelope) {
            Ok(message) => message,
            Err(e) => {
                error!("Failed to serialize {} envelope: {}", envelope.kind, e);
                self.metrics.error_occurred("serialization");
                return;
            }
        };

        let mut delivered = 0;
        let mut evicted = Vec::new();

        for member in &self.members {
            if !self.settings.echo_to_sender && Some(member.connection_id) == origin {
                continue;
            }

            match member.try_deliver(message.clone()) {
                Ok(()) => delivered += 1,
                Err(mpsc::error::TrySendError::Full(_)) => {
                    warn!(
                        "Outbound queue full for connection {} ({}), evicting from room {}",
                        member.connection_id, member.identity.user_id, self.project_id
                    );
                    evicted.push(member.connection_id);
                }
                Err(mpsc::error::TrySendError::Closed(_)) => {
                    debug!(
                        "Outbound queue closed for connection {}, evicting from room {}",
                        member.connection_id, self.project_id
                    );
                    evicted.push(member.connection_id);
                }
            }
        }

        if !evicted.is_empty() {
            self.members.retain(|m| !evicted.contains(&m.connection_id));
            self.shared.publish_members(self.members.len());
            for _ in &evicted {
                self.metrics.member_evicted();
            }
        }

        self.metrics
            .broadcast_published(&message.message_type, delivered);
    }

    fn roster(&self) -> Vec<RosterEntry> {
        self.members
            .iter()
            .map(|m| m.identity.roster_entry())
            .collect()
    }
}
