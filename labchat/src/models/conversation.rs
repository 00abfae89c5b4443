//! Conversation model representing one entry in the sidebar.

use super::generate_id;

/// Name given to a conversation until the user renames it.
pub const DEFAULT_CONVERSATION_NAME: &str = "New conversation";

/// A named, independently scoped message thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversation {
    /// Opaque, time-ordered identifier.
    pub id: String,
    /// User-editable display name.
    pub name: String,
}

impl Conversation {
    /// Create a conversation with a fresh id and the default name.
    pub fn new() -> Self {
        Self {
            id: generate_id(),
            name: DEFAULT_CONVERSATION_NAME.to_string(),
        }
    }

    /// First eight characters of the id, for compact listings.
    pub fn short_id(&self) -> &str {
        self.id.get(..8).unwrap_or(&self.id)
    }
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}
