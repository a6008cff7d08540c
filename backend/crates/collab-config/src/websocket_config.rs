use crate::{ConfigError, ConfigErrorResult};

use serde::Deserialize;

// Outbound queue capacity per connection
pub const MIN_SEND_BUFFER_SIZE: usize = 1;
pub const MAX_SEND_BUFFER_SIZE: usize = 10000;
pub const DEFAULT_SEND_BUFFER_SIZE: usize = 256;

// Read deadline (seconds), renewed by every inbound frame
pub const MIN_READ_TIMEOUT_SECS: u64 = 2;
pub const MAX_READ_TIMEOUT_SECS: u64 = 600;
pub const DEFAULT_READ_TIMEOUT_SECS: u64 = 60;

// Per-write deadline (seconds)
pub const MIN_WRITE_TIMEOUT_SECS: u64 = 1;
pub const MAX_WRITE_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_WRITE_TIMEOUT_SECS: u64 = 10;

// Largest inbound message (bytes)
pub const MIN_MAX_MESSAGE_SIZE: usize = 512;
pub const MAX_MAX_MESSAGE_SIZE: usize = 16 * 1024 * 1024;
pub const DEFAULT_MAX_MESSAGE_SIZE: usize = 64 * 1024;

/// WebSocket connection settings.
/// All values validated to be within reasonable operational ranges.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WebSocketConfig {
    /// Outbound queue capacity; a member that fills it is evicted
    pub send_buffer_size: usize,
    /// Close the connection after this long without an inbound frame
    pub read_timeout_secs: u64,
    /// Deadline for each frame write
    pub write_timeout_secs: u64,
    /// Maximum inbound message size in bytes
    pub max_message_size: usize,
    /// Join already-queued envelopes into one newline-separated frame
    pub coalesce_writes: bool,
}

impl Default for WebSocketConfig {
    fn default() -> Self {
        Self {
            send_buffer_size: DEFAULT_SEND_BUFFER_SIZE,
            read_timeout_secs: DEFAULT_READ_TIMEOUT_SECS,
            write_timeout_secs: DEFAULT_WRITE_TIMEOUT_SECS,
            max_message_size: DEFAULT_MAX_MESSAGE_SIZE,
            coalesce_writes: true,
        }
    }
}

impl WebSocketConfig {
    /// Validate all fields are within acceptable ranges.
    pub fn validate(&self) -> ConfigErrorResult<()> {
        if self.send_buffer_size < MIN_SEND_BUFFER_SIZE
            || self.send_buffer_size > MAX_SEND_BUFFER_SIZE
        {
            return Err(ConfigError::websocket(format!(
                "websocket.send_buffer_size must be {}-{}, got {}",
                MIN_SEND_BUFFER_SIZE, MAX_SEND_BUFFER_SIZE, self.send_buffer_size
            )));
        }

        if self.read_timeout_secs < MIN_READ_TIMEOUT_SECS
            || self.read_timeout_secs > MAX_READ_TIMEOUT_SECS
        {
            return Err(ConfigError::websocket(format!(
                "websocket.read_timeout_secs must be {}-{}, got {}",
                MIN_READ_TIMEOUT_SECS, MAX_READ_TIMEOUT_SECS, self.read_timeout_secs
            )));
        }

        if self.write_timeout_secs < MIN_WRITE_TIMEOUT_SECS
            || self.write_timeout_secs > MAX_WRITE_TIMEOUT_SECS
        {
            return Err(ConfigError::websocket(format!(
                "websocket.write_timeout_secs must be {}-{}, got {}",
                MIN_WRITE_TIMEOUT_SECS, MAX_WRITE_TIMEOUT_SECS, self.write_timeout_secs
            )));
        }

        if self.read_timeout_secs <= self.write_timeout_secs {
            return Err(ConfigError::websocket(format!(
                "websocket.read_timeout_secs ({}) must be greater than write_timeout_secs ({})",
                self.read_timeout_secs, self.write_timeout_secs
            )));
        }

        if self.max_message_size < MIN_MAX_MESSAGE_SIZE
            || self.max_message_size > MAX_MAX_MESSAGE_SIZE
        {
            return Err(ConfigError::websocket(format!(
                "websocket.max_message_size must be {}-{}, got {}",
                MIN_MAX_MESSAGE_SIZE, MAX_MAX_MESSAGE_SIZE, self.max_message_size
            )));
        }

        Ok(())
    }
}
