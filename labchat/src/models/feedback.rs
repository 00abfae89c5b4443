//! Feedback affordances shown under assistant replies.

/// An action a user can take on an assistant reply.
///
/// These are capability hooks only: invoking one never changes any state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackAction {
    /// Export the reply.
    Export,
    /// Import content into the reply.
    Import,
    /// Mark the reply as helpful.
    Approve,
    /// Mark the reply as unhelpful.
    Reject,
}

impl FeedbackAction {
    /// Every action, in display order.
    pub const ALL: [Self; 4] = [Self::Export, Self::Import, Self::Approve, Self::Reject];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Export => "export",
            Self::Import => "import",
            Self::Approve => "approve",
            Self::Reject => "reject",
        }
    }

    /// Parse an action name as typed in the REPL.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "export" => Some(Self::Export),
            "import" => Some(Self::Import),
            "approve" | "up" => Some(Self::Approve),
            "reject" | "down" => Some(Self::Reject),
            _ => None,
        }
    }
}

impl std::fmt::Display for FeedbackAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
