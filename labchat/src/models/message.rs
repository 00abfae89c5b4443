//! Message model representing one entry in a conversation log.

use chrono::Local;
use serde::Serialize;

use super::{generate_id, FeedbackAction};

/// Role of a message sender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// Message typed by the user.
    User,
    /// Reply (or error report) from the assistant.
    Assistant,
}

impl MessageRole {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

impl std::fmt::Display for MessageRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A message in a conversation log. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Unique identifier within the session.
    pub id: String,
    /// Text of the message, stored exactly as typed or received.
    pub content: String,
    /// Who sent the message.
    pub role: MessageRole,
    /// Local wall-clock time (`HH:MM`), for display only.
    pub timestamp: String,
}

impl Message {
    /// Create a message stamped with the current local time.
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            id: generate_id(),
            content: content.into(),
            role,
            timestamp: Local::now().format("%H:%M").to_string(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, content)
    }

    pub fn is_assistant(&self) -> bool {
        self.role == MessageRole::Assistant
    }

    /// Feedback affordances rendered under this message.
    pub fn feedback_actions(&self) -> &'static [FeedbackAction] {
        match self.role {
            MessageRole::Assistant => &FeedbackAction::ALL,
            MessageRole::User => &[],
        }
    }
}
