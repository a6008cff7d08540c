pub mod admission;
pub mod app_state;
pub mod broadcast_message;
pub mod connection_config;
pub mod connection_id;
pub mod envelope;
pub mod envelope_kind;
pub mod error;
pub mod error_codes;
pub mod hub;
pub mod member;
pub mod member_identity;
pub mod message_validator;
pub mod metrics;
pub mod presence_data;
pub mod room;
pub mod room_command;
pub mod room_handle;
pub mod room_settings;
pub mod room_summary;
pub mod roster_entry;
pub mod session_params;
pub mod shutdown_coordinator;
pub mod shutdown_guard;
pub mod web_socket_connection;

pub use admission::{Admission, Removal};
pub use app_state::{AppState, handler};
pub use broadcast_message::BroadcastMessage;
pub use connection_config::ConnectionConfig;
pub use connection_id::ConnectionId;
pub use envelope::Envelope;
pub use envelope_kind::EnvelopeKind;
pub use error::{RejectionBody, RejectionResponse, Result, WsError};
pub use hub::{Hub, Registration};
pub use member::Member;
pub use member_identity::MemberIdentity;
pub use message_validator::MessageValidator;
pub use metrics::Metrics;
pub use presence_data::PresenceData;
pub use room::Room;
pub use room_command::RoomCommand;
pub use room_handle::RoomHandle;
pub use room_settings::RoomSettings;
pub use room_summary::RoomSummary;
pub use roster_entry::RosterEntry;
pub use session_params::extract_identity;
pub use shutdown_coordinator::ShutdownCoordinator;
pub use shutdown_guard::ShutdownGuard;
pub use web_socket_connection::WebSocketConnection;

#[cfg(test)]
mod tests;

use tracing::info_span;

/// Create a tracing span for one WebSocket connection.
/// All log entries within the connection task will include these fields.
pub fn create_connection_span(
    connection_id: &str,
    project_id: &str,
    user_id: &str,
) -> tracing::Span {
    info_span!(
        "ws_connection",
        connection_id = %connection_id,
        project_id = %project_id,
        user_id = %user_id,
    )
}
