/// Result of routing a member to its room
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// Member added; `members` is the post-admission count
    Admitted { members: usize },
    /// Room was at capacity; the candidate was sent an `error` envelope
    Rejected { max_members: usize },
}

impl Admission {
    pub fn is_admitted(&self) -> bool {
        matches!(self, Self::Admitted { .. })
    }
}

/// Result of a removal request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Removal {
    /// False when the connection was not a member (already removed or evicted)
    pub removed: bool,
    pub remaining: usize,
}
