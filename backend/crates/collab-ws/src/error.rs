use crate::error_codes::{
    CONNECTION_CLOSED, HEARTBEAT_TIMEOUT, INTERNAL_ERROR, INVALID_MESSAGE, MISSING_PARAMETERS,
    ROOM_CLOSED, ROOM_FULL, SERIALIZATION_ERROR,
};

use std::panic::Location;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use error_location::ErrorLocation;
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WsError {
    #[error("Connection closed: {reason} {location}")]
    ConnectionClosed {
        reason: String,
        location: ErrorLocation,
    },

    #[error("Missing required parameters: {missing} {location}")]
    MissingParameters {
        missing: String,
        location: ErrorLocation,
    },

    #[error("room full, max {max} users {location}")]
    RoomFull { max: usize, location: ErrorLocation },

    #[error("Room {project_id} is no longer accepting commands {location}")]
    RoomClosed {
        project_id: String,
        location: ErrorLocation,
    },

    #[error("Invalid message: {message} {location}")]
    InvalidMessage {
        message: String,
        location: ErrorLocation,
    },

    #[error("JSON serialization failed: {source} {location}")]
    Serialization {
        #[source]
        source: serde_json::Error,
        location: ErrorLocation,
    },

    #[error("No frames received for {timeout_secs}s {location}")]
    HeartbeatTimeout {
        timeout_secs: u64,
        location: ErrorLocation,
    },

    #[error("Internal error: {message} {location}")]
    Internal {
        message: String,
        location: ErrorLocation,
    },
}

/// JSON body returned for rejections that happen before the upgrade
#[derive(Debug, Serialize)]
pub struct RejectionResponse {
    pub error: RejectionBody,
}

#[derive(Debug, Serialize)]
pub struct RejectionBody {
    pub code: String,
    pub message: String,
}

impl WsError {
    #[track_caller]
    pub fn room_full(max: usize) -> Self {
        Self::RoomFull {
            max,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn room_closed(project_id: impl Into<String>) -> Self {
        Self::RoomClosed {
            project_id: project_id.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            Self::ConnectionClosed { .. } => CONNECTION_CLOSED,
            Self::MissingParameters { .. } => MISSING_PARAMETERS,
            Self::RoomFull { .. } => ROOM_FULL,
            Self::RoomClosed { .. } => ROOM_CLOSED,
            Self::InvalidMessage { .. } => INVALID_MESSAGE,
            Self::Serialization { .. } => SERIALIZATION_ERROR,
            Self::HeartbeatTimeout { .. } => HEARTBEAT_TIMEOUT,
            Self::Internal { .. } => INTERNAL_ERROR,
        }
    }

    /// Message shown to clients, without the source location suffix.
    pub fn client_message(&self) -> String {
        match self {
            Self::MissingParameters { .. } => {
                "Missing required parameters: project_id, user_id, username".to_string()
            }
            Self::RoomFull { max, .. } => format!("room full, max {max} users"),
            Self::InvalidMessage { message, .. } => message.clone(),
            _ => "internal error".to_string(),
        }
    }

    fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingParameters { .. } | Self::InvalidMessage { .. } => {
                StatusCode::BAD_REQUEST
            }
            Self::RoomFull { .. } => StatusCode::FORBIDDEN,
            Self::RoomClosed { .. } => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for WsError {
    fn into_response(self) -> Response {
        log::warn!("Rejecting session request: {self}");

        let body = RejectionResponse {
            error: RejectionBody {
                code: self.error_code().to_string(),
                message: self.client_message(),
            },
        };

        (self.status_code(), Json(body)).into_response()
    }
}

impl From<serde_json::Error> for WsError {
    #[track_caller]
    fn from(source: serde_json::Error) -> Self {
        Self::Serialization {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

pub type Result<T> = std::result::Result<T, WsError>;
