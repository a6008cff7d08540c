use collab_ws::{AppState, RoomSummary};

use axum::{Json, extract::State};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct RoomListResponse {
    pub rooms: Vec<RoomSummary>,
}

/// GET /rooms - Live rooms ordered by project id
pub async fn list_rooms(State(state): State<AppState>) -> Json<RoomListResponse> {
    Json(RoomListResponse {
        rooms: state.hub.rooms().await,
    })
}
