use serde::{Deserialize, Serialize};

/// One participant as listed in presence notifications
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub user_id: String,
    pub username: String,
}
