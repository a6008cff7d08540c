use collab_ws::AppState;

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// GET /health - Status plus a snapshot of hub occupancy
pub async fn health(State(state): State<AppState>) -> Response {
    let status = if state.shutdown.is_shutdown() {
        "shutting_down"
    } else {
        "healthy"
    };

    let health = json!({
        "status": status,
        "version": env!("CARGO_PKG_VERSION"),
        "hub": {
            "rooms": state.hub.room_count().await,
            "members": state.hub.member_count().await,
            "max_members_per_room": state.hub.settings().max_members,
        },
        "timestamp": chrono::Utc::now().to_rfc3339(),
    });

    (StatusCode::OK, Json(health)).into_response()
}

/// GET /live - Liveness probe (is the process alive?)
pub async fn liveness() -> Response {
    (StatusCode::OK, "OK").into_response()
}

/// GET /ready - Readiness probe; refuses traffic once shutdown has begun
pub async fn readiness(State(state): State<AppState>) -> Response {
    if state.shutdown.is_shutdown() {
        return (StatusCode::SERVICE_UNAVAILABLE, "Shutting down").into_response();
    }

    (StatusCode::OK, "Ready").into_response()
}
