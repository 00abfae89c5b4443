//! Chat application root.
//!
//! `ChatApp` owns the conversation registry, the selected model and the
//! session for the active conversation. Every operation that changes the
//! selection or the model rebuilds the session through
//! [`ChatApp::reinitialize_session`]; nothing else touches that coupling.

use std::sync::Arc;

use crate::client::{AssistantClient, ChatReply, ExchangeError};
use crate::models::{ChatModel, Conversation, Message};
use crate::registry::{ConversationRegistry, RegistryError};
use crate::session::{ChatSession, PendingExchange, SendRejected, SessionState};

/// Result of a send. None of these are errors: failed requests still
/// produce a `Replied` assistant message describing the failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    /// The exchange settled and this assistant message was appended.
    Replied(Message),
    /// The send was refused before anything was recorded.
    Ignored(SendRejected),
    /// The reply had no pending request to answer, because its session was
    /// replaced or the exchange had already settled. It was dropped.
    Discarded,
}

pub struct ChatApp {
    registry: ConversationRegistry,
    model: ChatModel,
    session: Option<ChatSession>,
    generation: u64,
    client: Arc<dyn AssistantClient>,
}

impl std::fmt::Debug for ChatApp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatApp")
            .field("registry", &self.registry)
            .field("model", &self.model)
            .field("session", &self.session)
            .field("generation", &self.generation)
            .finish_non_exhaustive()
    }
}

impl ChatApp {
    pub fn new(client: Arc<dyn AssistantClient>, model: ChatModel) -> Self {
        Self {
            registry: ConversationRegistry::new(),
            model,
            session: None,
            generation: 0,
            client,
        }
    }

    pub const fn registry(&self) -> &ConversationRegistry {
        &self.registry
    }

    pub const fn model(&self) -> ChatModel {
        self.model
    }

    pub const fn session(&self) -> Option<&ChatSession> {
        self.session.as_ref()
    }

    pub fn session_mut(&mut self) -> Option<&mut ChatSession> {
        self.session.as_mut()
    }

    pub fn state(&self) -> SessionState {
        self.session
            .as_ref()
            .map_or(SessionState::Idle, ChatSession::state)
    }

    /// Create a conversation, select it and start a fresh session.
    pub fn create_conversation(&mut self) -> Conversation {
        let conversation = self.registry.create();
        self.reinitialize_session();
        conversation
    }

    /// Select a conversation and start a fresh session for it, even when it
    /// is already the active one.
    pub fn select_conversation(&mut self, id: &str) -> Result<(), RegistryError> {
        self.registry.select(id)?;
        self.reinitialize_session();
        Ok(())
    }

    /// Rename a conversation. The session is left alone.
    pub fn rename_conversation(&mut self, id: &str, new_name: &str) -> bool {
        self.registry.rename(id, new_name)
    }

    /// Switch models. An active conversation restarts with a new greeting.
    pub fn set_model(&mut self, model: ChatModel) {
        self.model = model;
        self.reinitialize_session();
    }

    /// Replace the session with one for the current selection and model.
    ///
    /// Any exchange still in flight belongs to the old generation and will be
    /// discarded when it completes.
    pub fn reinitialize_session(&mut self) {
        let Some(conversation_id) = self.registry.active_id().map(str::to_string) else {
            self.session = None;
            return;
        };

        if self.session.as_ref().is_some_and(ChatSession::is_pending) {
            tracing::info!(
                conversation_id = %conversation_id,
                "session replaced while a request was pending"
            );
        }

        self.generation += 1;
        tracing::info!(
            conversation_id = %conversation_id,
            model = %self.model,
            generation = self.generation,
            "session initialized"
        );
        self.session = Some(ChatSession::new(
            conversation_id,
            self.model,
            self.generation,
        ));
    }

    /// Record a user message in the active session and return the request
    /// to dispatch. Pair with [`ChatApp::complete`].
    pub fn begin_send(&mut self, text: &str) -> Result<PendingExchange, SendRejected> {
        let session = self.session.as_mut().ok_or(SendRejected::NoConversation)?;
        session.begin_send(text)
    }

    /// Settle an exchange started with [`ChatApp::begin_send`].
    pub fn complete(
        &mut self,
        exchange: PendingExchange,
        outcome: Result<ChatReply, ExchangeError>,
    ) -> SendOutcome {
        let generation = exchange.generation;
        let conversation_id = exchange.conversation_id.clone();

        let settled = self
            .session
            .as_mut()
            .filter(|s| s.generation() == generation)
            .and_then(|s| s.settle(exchange, outcome))
            .cloned();
        if let Some(reply) = settled {
            return SendOutcome::Replied(reply);
        }

        tracing::warn!(
            conversation_id = %conversation_id,
            generation,
            current = ?self.session.as_ref().map(ChatSession::conversation_id),
            "dropping reply with no pending request"
        );
        SendOutcome::Discarded
    }

    /// Send whatever the active session's input buffer holds.
    pub async fn send_input(&mut self) -> SendOutcome {
        let text = self
            .session
            .as_ref()
            .map(|s| s.input().to_string())
            .unwrap_or_default();
        self.send_message(&text).await
    }

    /// Send `text` in the active conversation and wait for the reply.
    pub async fn send_message(&mut self, text: &str) -> SendOutcome {
        let exchange = match self.begin_send(text) {
            Ok(exchange) => exchange,
            Err(reason) => return SendOutcome::Ignored(reason),
        };

        tracing::info!(
            conversation_id = %exchange.conversation_id,
            model = %exchange.request.model,
            "sending message"
        );
        let outcome = self.client.chat(&exchange.request).await;

        self.complete(exchange, outcome)
    }
}
