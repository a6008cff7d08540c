use crate::{
    EnvelopeKind, MemberIdentity, PresenceData, Result as WsErrorResult, RosterEntry,
};

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Uniform message carried over a room session.
///
/// Client events and server notifications share this shape so every
/// participant receives one structurally identical stream:
/// `{type, data, project_id, user_id, username}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    #[serde(rename = "type")]
    pub kind: EnvelopeKind,
    #[serde(default)]
    pub data: Value,
    #[serde(default)]
    pub project_id: String,
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub username: String,
}

impl Envelope {
    pub fn event(kind: impl Into<EnvelopeKind>, data: Value) -> Self {
        Self {
            kind: kind.into(),
            data,
            project_id: String::new(),
            user_id: String::new(),
            username: String::new(),
        }
    }

    pub fn user_joined(
        project_id: &str,
        joined: &MemberIdentity,
        roster: Vec<RosterEntry>,
    ) -> WsErrorResult<Self> {
        let data = PresenceData::new(format!("{} joined the room", joined.username), roster);
        Self::presence(EnvelopeKind::UserJoined, project_id, joined, data)
    }

    pub fn user_left(
        project_id: &str,
        left: &MemberIdentity,
        roster: Vec<RosterEntry>,
    ) -> WsErrorResult<Self> {
        let data = PresenceData::new(format!("{} left the room", left.username), roster);
        Self::presence(EnvelopeKind::UserLeft, project_id, left, data)
    }

    /// Server-synthesized error addressed to a single connection
    pub fn error(target: &MemberIdentity, code: &str, message: impl Into<String>) -> Self {
        Self {
            kind: EnvelopeKind::Error,
            data: json!({ "code": code, "message": message.into() }),
            project_id: target.project_id.clone(),
            user_id: target.user_id.clone(),
            username: target.username.clone(),
        }
    }

    /// Overwrite identity fields with the server-known identity of the sender
    pub fn stamp(&mut self, identity: &MemberIdentity) {
        self.project_id.clone_from(&identity.project_id);
        self.user_id.clone_from(&identity.user_id);
        self.username.clone_from(&identity.username);
    }

    pub fn to_json(&self) -> WsErrorResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(text: &str) -> WsErrorResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    fn presence(
        kind: EnvelopeKind,
        project_id: &str,
        subject: &MemberIdentity,
        data: PresenceData,
    ) -> WsErrorResult<Self> {
        Ok(Self {
            kind,
            data: serde_json::to_value(data)?,
            project_id: project_id.to_string(),
            user_id: subject.user_id.clone(),
            username: subject.username.clone(),
        })
    }
}
