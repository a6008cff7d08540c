use serde::Serialize;

/// Point-in-time view of a room, as listed by `GET /rooms`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoomSummary {
    pub id: String,
    pub users_count: usize,
    pub max_users: usize,
}
