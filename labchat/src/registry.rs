//! Conversation registry: the ordered list of conversations and which one
//! is selected.

use crate::models::Conversation;

/// Errors raised by registry lookups.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("no conversation matches '{0}'")]
    UnknownConversation(String),
    #[error("'{0}' matches more than one conversation")]
    AmbiguousReference(String),
}

/// Owns every conversation and the selection pointer.
#[derive(Debug, Default)]
pub struct ConversationRegistry {
    conversations: Vec<Conversation>,
    active: Option<String>,
}

impl ConversationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a new conversation and select it.
    pub fn create(&mut self) -> Conversation {
        let conversation = Conversation::new();
        self.conversations.push(conversation.clone());
        self.active = Some(conversation.id.clone());

        tracing::info!(conversation_id = %conversation.id, "conversation created");
        conversation
    }

    /// Select an existing conversation. Unknown ids leave the selection as is.
    pub fn select(&mut self, id: &str) -> Result<(), RegistryError> {
        if self.get(id).is_none() {
            return Err(RegistryError::UnknownConversation(id.to_string()));
        }
        self.active = Some(id.to_string());
        Ok(())
    }

    /// Rename a conversation in place.
    ///
    /// Names that are empty after trimming are refused. Returns whether a
    /// conversation was renamed.
    pub fn rename(&mut self, id: &str, new_name: &str) -> bool {
        if new_name.trim().is_empty() {
            return false;
        }
        let Some(conversation) = self.conversations.iter_mut().find(|c| c.id == id) else {
            return false;
        };
        conversation.name = new_name.to_string();

        tracing::info!(conversation_id = %id, name = %new_name, "conversation renamed");
        true
    }

    pub fn conversations(&self) -> &[Conversation] {
        &self.conversations
    }

    pub fn get(&self, id: &str) -> Option<&Conversation> {
        self.conversations.iter().find(|c| c.id == id)
    }

    pub fn active_id(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn active(&self) -> Option<&Conversation> {
        self.active.as_deref().and_then(|id| self.get(id))
    }

    pub fn is_empty(&self) -> bool {
        self.conversations.is_empty()
    }

    /// Resolve a user-typed reference to a conversation id.
    ///
    /// Accepts a 1-based position in the list, a full id, or an id prefix
    /// that matches exactly one conversation.
    pub fn resolve(&self, reference: &str) -> Result<&str, RegistryError> {
        let reference = reference.trim();

        // Purely numeric references are positions, never id prefixes.
        if let Ok(position) = reference.parse::<usize>() {
            return position
                .checked_sub(1)
                .and_then(|i| self.conversations.get(i))
                .map(|c| c.id.as_str())
                .ok_or_else(|| RegistryError::UnknownConversation(reference.to_string()));
        }

        if let Some(conversation) = self.get(reference) {
            return Ok(&conversation.id);
        }

        if reference.is_empty() {
            return Err(RegistryError::UnknownConversation(reference.to_string()));
        }

        let mut matches = self
            .conversations
            .iter()
            .filter(|c| c.id.starts_with(reference));
        match (matches.next(), matches.next()) {
            (Some(conversation), None) => Ok(&conversation.id),
            (Some(_), Some(_)) => Err(RegistryError::AmbiguousReference(reference.to_string())),
            (None, _) => Err(RegistryError::UnknownConversation(reference.to_string())),
        }
    }
}
