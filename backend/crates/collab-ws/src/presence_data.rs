use crate::RosterEntry;

use serde::{Deserialize, Serialize};

/// `data` payload of `user_joined` / `user_left` envelopes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresenceData {
    pub message: String,
    pub users_count: usize,
    pub users: Vec<RosterEntry>,
}

impl PresenceData {
    pub fn new(message: impl Into<String>, users: Vec<RosterEntry>) -> Self {
        Self {
            message: message.into(),
            users_count: users.len(),
            users,
        }
    }
}
