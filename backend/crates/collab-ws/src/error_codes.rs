//! Standard error codes for rejections and `error` envelopes.

/// Target room is at capacity
pub const ROOM_FULL: &str = "ROOM_FULL";

/// project_id, user_id or username missing from the session request
pub const MISSING_PARAMETERS: &str = "MISSING_PARAMETERS";

/// Room loop has stopped
pub const ROOM_CLOSED: &str = "ROOM_CLOSED";

/// Invalid message format
pub const INVALID_MESSAGE: &str = "INVALID_MESSAGE";

pub const SERIALIZATION_ERROR: &str = "SERIALIZATION_ERROR";

pub const HEARTBEAT_TIMEOUT: &str = "HEARTBEAT_TIMEOUT";

pub const CONNECTION_CLOSED: &str = "CONNECTION_CLOSED";

/// Internal server error
pub const INTERNAL_ERROR: &str = "INTERNAL_ERROR";
