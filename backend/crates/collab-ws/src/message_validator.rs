use crate::{Envelope, Result as WsErrorResult, WsError};

use std::panic::Location;

use error_location::ErrorLocation;

pub const MAX_TYPE_LENGTH: usize = 64;

/// Validates envelopes received from clients
pub struct MessageValidator;

impl MessageValidator {
    /// Parse one inbound frame. Surrounding whitespace and embedded newlines
    /// are tolerated; anything else that is not an envelope is rejected.
    #[track_caller]
    pub fn parse_inbound(text: &str) -> WsErrorResult<Envelope> {
        let normalized = text.trim().replace('\n', " ");

        if normalized.is_empty() {
            return Err(WsError::InvalidMessage {
                message: "empty frame".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let envelope: Envelope =
            serde_json::from_str(&normalized).map_err(|e| WsError::InvalidMessage {
                message: format!("not an envelope: {e}"),
                location: ErrorLocation::from(Location::caller()),
            })?;

        Self::validate_inbound(&envelope)?;
        Ok(envelope)
    }

    /// Client events need an application type; system types are server-only
    #[track_caller]
    pub fn validate_inbound(envelope: &Envelope) -> WsErrorResult<()> {
        let kind = envelope.kind.as_str();

        if kind.trim().is_empty() {
            return Err(WsError::InvalidMessage {
                message: "type cannot be empty".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        if kind.len() > MAX_TYPE_LENGTH {
            return Err(WsError::InvalidMessage {
                message: format!("type exceeds maximum length ({MAX_TYPE_LENGTH})"),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        if envelope.kind.is_system() {
            return Err(WsError::InvalidMessage {
                message: format!("type '{kind}' is reserved for the server"),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        Ok(())
    }
}
