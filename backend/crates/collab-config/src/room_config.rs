use crate::{ConfigError, ConfigErrorResult};

use serde::Deserialize;

// Members admitted per room
pub const MIN_MAX_MEMBERS: usize = 1;
pub const MAX_MAX_MEMBERS: usize = 1000;
pub const DEFAULT_MAX_MEMBERS: usize = 4;

// Command queue feeding each room loop
pub const MIN_COMMAND_BUFFER_SIZE: usize = 1;
pub const MAX_COMMAND_BUFFER_SIZE: usize = 10000;
pub const DEFAULT_COMMAND_BUFFER_SIZE: usize = 256;

/// Per-room limits and delivery behaviour
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RoomConfig {
    /// Capacity of each project's room
    pub max_members: usize,
    /// Bounded queue of admit/remove/broadcast commands per room
    pub command_buffer_size: usize,
    /// Deliver a member's own events back to it
    pub echo_to_sender: bool,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            max_members: DEFAULT_MAX_MEMBERS,
            command_buffer_size: DEFAULT_COMMAND_BUFFER_SIZE,
            echo_to_sender: true,
        }
    }
}

impl RoomConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        if self.max_members < MIN_MAX_MEMBERS || self.max_members > MAX_MAX_MEMBERS {
            return Err(ConfigError::room(format!(
                "room.max_members must be {}-{}, got {}",
                MIN_MAX_MEMBERS, MAX_MAX_MEMBERS, self.max_members
            )));
        }

        if self.command_buffer_size < MIN_COMMAND_BUFFER_SIZE
            || self.command_buffer_size > MAX_COMMAND_BUFFER_SIZE
        {
            return Err(ConfigError::room(format!(
                "room.command_buffer_size must be {}-{}, got {}",
                MIN_COMMAND_BUFFER_SIZE, MAX_COMMAND_BUFFER_SIZE, self.command_buffer_size
            )));
        }

        Ok(())
    }
}
