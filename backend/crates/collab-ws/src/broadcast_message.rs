use crate::{Envelope, Result as WsErrorResult};

use axum::extract::ws::Utf8Bytes;

/// A serialized envelope queued for delivery to one or more members
#[derive(Debug, Clone)]
pub struct BroadcastMessage {
    /// JSON text, ready to send on the wire (cheap to clone per member)
    pub payload: Utf8Bytes,
    /// Envelope type for metrics/logging
    pub message_type: String,
}

impl BroadcastMessage {
    pub fn new(payload: impl Into<Utf8Bytes>, message_type: impl Into<String>) -> Self {
        Self {
            payload: payload.into(),
            message_type: message_type.into(),
        }
    }

    pub fn from_envelope(envelope: &Envelope) -> WsErrorResult<Self> {
        Ok(Self::new(envelope.to_json()?, envelope.kind.as_str()))
    }
}
