use std::fmt;

pub const USER_JOINED: &str = "user_joined";
pub const USER_LEFT: &str = "user_left";
pub const ERROR: &str = "error";

/// The `type` tag of an [`Envelope`](crate::Envelope).
///
/// Anything that is not one of the server-synthesized kinds is an
/// application-defined event (`"edit"`, `"chat"`, `"cursor"`, ...) and is
/// relayed verbatim. Inbound frames tagged `user_joined`, `user_left` or
/// `error` are dropped by the validator and never reach a room.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EnvelopeKind {
    UserJoined,
    UserLeft,
    Error,
    Event(String),
}

impl EnvelopeKind {
    pub fn as_str(&self) -> &str {
        match self {
            Self::UserJoined => USER_JOINED,
            Self::UserLeft => USER_LEFT,
            Self::Error => ERROR,
            Self::Event(name) => name,
        }
    }

    /// Kinds only the server may emit; clients sending them are dropped
    pub fn is_system(&self) -> bool {
        !matches!(self, Self::Event(_))
    }
}

impl From<String> for EnvelopeKind {
    fn from(value: String) -> Self {
        match value.as_str() {
            USER_JOINED => Self::UserJoined,
            USER_LEFT => Self::UserLeft,
            ERROR => Self::Error,
            _ => Self::Event(value),
        }
    }
}

impl From<&str> for EnvelopeKind {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<EnvelopeKind> for String {
    fn from(kind: EnvelopeKind) -> Self {
        match kind {
            EnvelopeKind::Event(name) => name,
            other => other.as_str().to_string(),
        }
    }
}

impl fmt::Display for EnvelopeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
