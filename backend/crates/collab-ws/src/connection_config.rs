use std::time::Duration;

pub const DEFAULT_SEND_BUFFER_SIZE: usize = 256;
pub const DEFAULT_READ_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_WRITE_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_MAX_MESSAGE_SIZE: usize = 64 * 1024;

/// Configuration for WebSocket connections
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    /// Outbound queue capacity (a full queue gets the member evicted)
    pub send_buffer_size: usize,
    /// Connection is considered dead after this long without any inbound frame
    pub read_timeout_secs: u64,
    /// Deadline for a single frame write
    pub write_timeout_secs: u64,
    /// Largest inbound message accepted before the connection is dropped
    pub max_message_size: usize,
    /// Join already-queued envelopes into one newline-separated text frame
    pub coalesce_writes: bool,
}

impl Default for ConnectionConfig {
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

impl ConnectionConfig {
    pub fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.read_timeout_secs)
    }

    pub fn write_timeout(&self) -> Duration {
        Duration::from_secs(self.write_timeout_secs)
    }

    /// Idle time after which a ping goes out: 9/10 of the read timeout, so
    /// a quiet but healthy peer always answers before its deadline.
    pub fn ping_interval(&self) -> Duration {
        self.read_timeout() * 9 / 10
    }
}
