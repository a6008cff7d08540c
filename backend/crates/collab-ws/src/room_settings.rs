pub const DEFAULT_MAX_MEMBERS: usize = 4;
pub const DEFAULT_COMMAND_BUFFER_SIZE: usize = 256;

/// Per-room limits and delivery behaviour
#[derive(Debug, Clone)]
pub struct RoomSettings {
    /// Maximum admitted members per room
    pub max_members: usize,
    /// Bounded command queue feeding the room loop
    pub command_buffer_size: usize,
    /// Deliver a member's own events back to it
    pub echo_to_sender: bool,
}

impl Default for RoomSettings {
    fn default() -> Self {
        Self {
            max_members: DEFAULT_MAX_MEMBERS,
            command_buffer_size: DEFAULT_COMMAND_BUFFER_SIZE,
            echo_to_sender: true,
        }
    }
}
