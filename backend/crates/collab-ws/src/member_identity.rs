use crate::RosterEntry;

/// Server-known identity of a connection, supplied by the session request.
///
/// The hub trusts these values: authentication happens before a request
/// reaches `/ws`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberIdentity {
    pub project_id: String,
    pub user_id: String,
    pub username: String,
}

impl MemberIdentity {
    pub fn new(
        project_id: impl Into<String>,
        user_id: impl Into<String>,
        username: impl Into<String>,
    ) -> Self {
        Self {
            project_id: project_id.into(),
            user_id: user_id.into(),
            username: username.into(),
        }
    }

    pub fn roster_entry(&self) -> RosterEntry {
        RosterEntry {
            user_id: self.user_id.clone(),
            username: self.username.clone(),
        }
    }
}
