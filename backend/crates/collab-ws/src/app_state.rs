use crate::{
    ConnectionConfig, ConnectionId, Hub, MemberIdentity, Metrics, ShutdownCoordinator,
    WebSocketConnection, WsError, create_connection_span, session_params,
};

use std::collections::HashMap;

use axum::{
    extract::{
        Query, State,
        ws::{WebSocket, WebSocketUpgrade},
    },
    response::Response,
};
use log::{debug, error};
use tracing::Instrument;

/// Shared application state for WebSocket handlers
#[derive(Clone)]
pub struct AppState {
    pub hub: Hub,
    pub metrics: Metrics,
    pub shutdown: ShutdownCoordinator,
    pub config: ConnectionConfig,
}

/// Session bootstrap: validate the identity parameters, turn away requests
/// for rooms that are visibly full, then upgrade.
pub async fn handler(
    State(state): State<AppState>,
    Query(query_params): Query<HashMap<String, String>>,
    ws: WebSocketUpgrade,
) -> Result<Response, WsError> {
    let identity = session_params::extract_identity(&query_params)?;
    debug!(
        "WebSocket upgrade request from user {} for project {}",
        identity.user_id, identity.project_id
    );

    // Best effort only: the room loop makes the binding capacity decision
    if let Some(room) = state.hub.get_room(&identity.project_id).await
        && room.is_full()
    {
        state.metrics.member_rejected();
        return Err(WsError::room_full(room.max_members()));
    }

    let connection_id = ConnectionId::new();

    Ok(ws
        .max_message_size(state.config.max_message_size)
        .on_upgrade(move |socket| handle_socket(socket, connection_id, identity, state)))
}

/// Handle WebSocket connection after upgrade
async fn handle_socket(
    socket: WebSocket,
    connection_id: ConnectionId,
    identity: MemberIdentity,
    state: AppState,
) {
    let shutdown_guard = state.shutdown.subscribe_guard();
    let span = create_connection_span(
        &connection_id.to_string(),
        &identity.project_id,
        &identity.user_id,
    );

    let connection = WebSocketConnection::new(
        connection_id,
        identity,
        state.config,
        state.metrics.clone(),
        state.hub,
    );

    let result = connection
        .handle(socket, shutdown_guard)
        .instrument(span)
        .await;

    if let Err(e) = result {
        error!("Connection {connection_id} error: {e}");
    }
}
