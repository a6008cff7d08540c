use crate::{
    Admission, BroadcastMessage, ConnectionConfig, ConnectionId, Hub, Member, MemberIdentity,
    MessageValidator, Metrics, Registration, Result as WsErrorResult, RoomHandle, ShutdownGuard,
    WsError,
};

use std::fmt::Display;
use std::panic::Location;
use std::time::Duration;

use axum::extract::ws::{Message, Utf8Bytes, WebSocket};
use bytes::Bytes;
use error_location::ErrorLocation;
use futures::{Sink, SinkExt, StreamExt};
use log::{debug, error, info, warn};
use tokio::sync::mpsc;
use tokio::time::{Instant, MissedTickBehavior};

/// Manages a single WebSocket connection: registers it with its room, relays
/// inbound envelopes, and drains the outbound queue onto the socket.
pub struct WebSocketConnection {
    connection_id: ConnectionId,
    identity: MemberIdentity,
    config: ConnectionConfig,
    metrics: Metrics,
    hub: Hub,
}

impl WebSocketConnection {
    pub fn new(
        connection_id: ConnectionId,
        identity: MemberIdentity,
        config: ConnectionConfig,
        metrics: Metrics,
        hub: Hub,
    ) -> Self {
        Self {
            connection_id,
            identity,
            config,
            metrics,
            hub,
        }
    }

    /// Handle the WebSocket connection lifecycle
    pub async fn handle(
        self,
        socket: WebSocket,
        mut shutdown_guard: ShutdownGuard,
    ) -> WsErrorResult<()> {
        info!(
            "WebSocket connection {} established for project {} (user {})",
            self.connection_id, self.identity.project_id, self.identity.user_id
        );

        self.metrics.connection_established();

        let (ws_sender, mut ws_receiver) = socket.split();

        // Bounded: a member that falls this far behind is evicted by its room
        let (tx, rx) = mpsc::channel::<BroadcastMessage>(self.config.send_buffer_size.max(1));

        let mut write_task = tokio::spawn(write_loop(
            ws_sender,
            rx,
            self.config.clone(),
            self.metrics.clone(),
            self.connection_id,
        ));
        let mut write_finished = false;

        // The queue sender moves into the member; from here on the room owns it
        let member = Member::new(self.connection_id, self.identity.clone(), tx);
        let room = self.register(member).await;

        let mut deadline = Instant::now() + self.config.read_timeout();

        let result = loop {
            tokio::select! {
                frame = tokio::time::timeout_at(deadline, ws_receiver.next()) => {
                    match frame {
                        Ok(Some(Ok(msg))) => {
                            // Any frame proves the peer is alive
                            deadline = Instant::now() + self.config.read_timeout();

                            if let Err(e) = self.handle_client_message(msg, room.as_ref()).await {
                                error!(
                                    "Error handling message from connection {}: {}",
                                    self.connection_id, e
                                );
                                self.metrics.error_occurred("message_handling");
                                break Err(e);
                            }
                        }
                        Ok(Some(Err(e))) => {
                            warn!("WebSocket error on connection {}: {}", self.connection_id, e);
                            break Err(WsError::ConnectionClosed {
                                reason: format!("WebSocket error: {e}"),
                                location: ErrorLocation::from(Location::caller()),
                            });
                        }
                        Ok(None) => {
                            info!("Connection {} closed by client", self.connection_id);
                            break Ok(());
                        }
                        Err(_) => {
                            warn!(
                                "Connection {} silent for {}s, closing",
                                self.connection_id, self.config.read_timeout_secs
                            );
                            self.metrics.error_occurred("heartbeat_timeout");
                            break Err(WsError::HeartbeatTimeout {
                                timeout_secs: self.config.read_timeout_secs,
                                location: ErrorLocation::from(Location::caller()),
                            });
                        }
                    }
                }

                // Write side gave up: queue closed by the room, or the socket failed
                joined = &mut write_task => {
                    write_finished = true;
                    break match joined {
                        Ok(result) => result,
                        Err(e) => Err(WsError::Internal {
                            message: format!("write task failed: {e}"),
                            location: ErrorLocation::from(Location::caller()),
                        }),
                    };
                }

                _ = shutdown_guard.wait() => {
                    info!("Shutting down connection {} gracefully", self.connection_id);
                    break Ok(());
                }
            }
        };

        // Single exit path: unregistration happens exactly once per connection
        let removal = self
            .hub
            .unregister(&self.identity.project_id, self.connection_id)
            .await;
        debug!(
            "Connection {} unregistered (removed: {}, remaining: {})",
            self.connection_id, removal.removed, removal.remaining
        );

        // The member is gone, so the queue is closed: let the writer flush and send Close
        if !write_finished
            && tokio::time::timeout(self.config.write_timeout(), &mut write_task)
                .await
                .is_err()
        {
            warn!(
                "Write loop for connection {} did not finish in time, aborting",
                self.connection_id
            );
            write_task.abort();
        }

        self.metrics
            .connection_closed(if result.is_ok() { "normal" } else { "error" });

        info!(
            "WebSocket connection {} closed for project {}",
            self.connection_id, self.identity.project_id
        );

        result
    }

    /// Join the project's room. `None` when the room turned the connection
    /// away; the connection then only lives until its queue is flushed.
    async fn register(&self, member: Member) -> Option<RoomHandle> {
        match self.hub.register(member).await {
            Ok(Registration {
                room,
                admission: Admission::Admitted { members },
            }) => {
                debug!(
                    "Connection {} admitted to room {} ({} members)",
                    self.connection_id,
                    room.project_id(),
                    members
                );
                Some(room)
            }
            Ok(Registration {
                admission: Admission::Rejected { max_members },
                ..
            }) => {
                info!(
                    "Connection {} rejected: room {} full (max {})",
                    self.connection_id, self.identity.project_id, max_members
                );
                None
            }
            Err(e) => {
                error!(
                    "Failed to register connection {}: {}",
                    self.connection_id, e
                );
                self.metrics.error_occurred("registration");
                None
            }
        }
    }

    /// Handle a frame from the client
    async fn handle_client_message(
        &self,
        msg: Message,
        room: Option<&RoomHandle>,
    ) -> WsErrorResult<()> {
        match msg {
            Message::Text(text) => self.relay(text.as_str(), room).await,
            Message::Binary(data) => match std::str::from_utf8(&data) {
                Ok(text) => self.relay(text, room).await,
                Err(_) => {
                    warn!(
                        "Dropping non-UTF-8 binary frame ({} bytes) from connection {}",
                        data.len(),
                        self.connection_id
                    );
                    self.metrics.message_rejected();
                    Ok(())
                }
            },
            Message::Ping(_) => {
                // Answered by the protocol layer
                Ok(())
            }
            Message::Pong(_) => {
                debug!("Heartbeat from connection {}", self.connection_id);
                Ok(())
            }
            Message::Close(_) => {
                info!("Received close frame from connection {}", self.connection_id);
                Ok(())
            }
        }
    }

    /// Validate, stamp, and hand an inbound envelope to the room.
    /// Malformed frames are dropped; the connection stays open.
    async fn relay(&self, text: &str, room: Option<&RoomHandle>) -> WsErrorResult<()> {
        let mut envelope = match MessageValidator::parse_inbound(text) {
            Ok(envelope) => envelope,
            Err(e) => {
                warn!(
                    "Dropping malformed message from connection {}: {}",
                    self.connection_id, e
                );
                self.metrics.message_rejected();
                return Ok(());
            }
        };

        let Some(room) = room else {
            debug!(
                "Ignoring {} from connection {}: not admitted",
                envelope.kind, self.connection_id
            );
            return Ok(());
        };

        envelope.stamp(&self.identity);
        self.metrics.message_received(envelope.kind.as_str());
        debug!(
            "Relaying {} from connection {} to room {}",
            envelope.kind,
            self.connection_id,
            room.project_id()
        );

        room.broadcast(Some(self.connection_id), envelope).await
    }
}

/// Drain the outbound queue onto the socket.
///
/// Pings on a fixed period, independent of outbound traffic, and sends a
/// Close frame once the queue is closed. A write that fails or exceeds the
/// write timeout ends the loop with an error.
pub(crate) async fn write_loop<S>(
    mut sink: S,
    mut queue: mpsc::Receiver<BroadcastMessage>,
    config: ConnectionConfig,
    metrics: Metrics,
    connection_id: ConnectionId,
) -> WsErrorResult<()>
where
    S: Sink<Message> + Unpin,
    S::Error: Display,
{
    let ping_interval = config.ping_interval();
    let mut ping = tokio::time::interval_at(Instant::now() + ping_interval, ping_interval);
    ping.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            next = queue.recv() => {
                let Some(first) = next else {
                    debug!("Outbound queue closed for connection {}", connection_id);
                    let _ = write_frame(&mut sink, Message::Close(None), config.write_timeout()).await;
                    return Ok(());
                };

                let frame = coalesce_pending(first, &mut queue, config.coalesce_writes, &metrics);
                write_frame(&mut sink, Message::Text(frame), config.write_timeout()).await?;
            }

            _ = ping.tick() => {
                debug!("Pinging idle connection {}", connection_id);
                write_frame(&mut sink, Message::Ping(Bytes::new()), config.write_timeout()).await?;
            }
        }
    }
}

/// Merge the messages already waiting behind `first` into a single
/// newline-separated text frame. Only what is queued right now is taken.
pub(crate) fn coalesce_pending(
    first: BroadcastMessage,
    queue: &mut mpsc::Receiver<BroadcastMessage>,
    enabled: bool,
    metrics: &Metrics,
) -> Utf8Bytes {
    metrics.message_sent(&first.message_type);

    if !enabled {
        return first.payload;
    }

    let pending = queue.len();
    if pending == 0 {
        return first.payload;
    }

    let mut batch = String::from(first.payload.as_str());
    for _ in 0..pending {
        let Ok(next) = queue.try_recv() else {
            break;
        };
        metrics.message_sent(&next.message_type);
        batch.push('\n');
        batch.push_str(next.payload.as_str());
    }

    Utf8Bytes::from(batch)
}

async fn write_frame<S>(sink: &mut S, msg: Message, timeout: Duration) -> WsErrorResult<()>
where
    S: Sink<Message> + Unpin,
    S::Error: Display,
{
    match tokio::time::timeout(timeout, sink.send(msg)).await {
        Ok(Ok(())) => Ok(()),
        Ok(Err(e)) => Err(WsError::ConnectionClosed {
            reason: format!("write failed: {e}"),
            location: ErrorLocation::from(Location::caller()),
        }),
        Err(_) => Err(WsError::ConnectionClosed {
            reason: format!("write timed out after {}s", timeout.as_secs()),
            location: ErrorLocation::from(Location::caller()),
        }),
    }
}
