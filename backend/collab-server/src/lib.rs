pub mod error;
pub mod health;
pub mod logger;
pub mod rooms;
pub mod routes;

pub use crate::routes::build_router;

use collab_config::Config;
use collab_ws::{AppState, ConnectionConfig, Hub, Metrics, RoomSettings, ShutdownCoordinator};

/// Wire the hub and connection settings from loaded configuration
pub fn build_app_state(config: &Config) -> AppState {
    let metrics = Metrics::new();

    let room_settings = RoomSettings {
        max_members: config.room.max_members,
        command_buffer_size: config.room.command_buffer_size,
        echo_to_sender: config.room.echo_to_sender,
    };

    let connection_config = ConnectionConfig {
        send_buffer_size: config.websocket.send_buffer_size,
        read_timeout_secs: config.websocket.read_timeout_secs,
        write_timeout_secs: config.websocket.write_timeout_secs,
        max_message_size: config.websocket.max_message_size,
        coalesce_writes: config.websocket.coalesce_writes,
    };

    AppState {
        hub: Hub::new(room_settings, metrics.clone()),
        metrics,
        shutdown: ShutdownCoordinator::new(),
        config: connection_config,
    }
}
