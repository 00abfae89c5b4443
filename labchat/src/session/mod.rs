//! Message exchange session for the active conversation.
//!
//! A session owns the message log, the input buffer and the pending flag.
//! Sending is split in two halves so the caller controls the network call:
//! [`ChatSession::begin_send`] records the user's message and hands back a
//! [`PendingExchange`], and [`ChatSession::settle`] appends the single
//! assistant message that answers it.

use crate::client::{ChatReply, ChatRequest, ExchangeError};
use crate::models::{ChatModel, FeedbackAction, Message};

/// Name the assistant introduces itself with.
pub const ASSISTANT_NAME: &str = "Engineer Growth Lab Agent";

/// Lifecycle of the chat panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No conversation selected.
    Idle,
    /// Greeting shown, waiting for input.
    Ready,
    /// A request is in flight.
    Awaiting,
}

/// Why a send was refused. Refusals never change session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendRejected {
    /// Input was empty after trimming.
    EmptyInput,
    /// A previous request has not settled yet.
    Busy,
    /// No conversation is selected.
    NoConversation,
}

/// A request that has been recorded in the log but not yet answered.
///
/// Settling consumes it, so one exchange yields at most one reply.
#[derive(Debug, PartialEq, Eq)]
pub struct PendingExchange {
    /// Generation of the session that issued the request.
    pub generation: u64,
    pub conversation_id: String,
    pub request: ChatRequest,
}

/// Live message log and request state for one conversation.
#[derive(Debug, Clone)]
pub struct ChatSession {
    conversation_id: String,
    model: ChatModel,
    generation: u64,
    messages: Vec<Message>,
    input: String,
    pending: bool,
}

/// Greeting that opens every session.
pub fn greeting(model: ChatModel) -> String {
    format!("Hello, I am {ASSISTANT_NAME} ({model}). How may I assist you today?")
}

impl ChatSession {
    /// Start a session whose log holds only the greeting.
    pub fn new(conversation_id: impl Into<String>, model: ChatModel, generation: u64) -> Self {
        Self {
            conversation_id: conversation_id.into(),
            model,
            generation,
            messages: vec![Message::assistant(greeting(model))],
            input: String::new(),
            pending: false,
        }
    }

    pub fn conversation_id(&self) -> &str {
        &self.conversation_id
    }

    pub const fn model(&self) -> ChatModel {
        self.model
    }

    pub const fn generation(&self) -> u64 {
        self.generation
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub const fn is_pending(&self) -> bool {
        self.pending
    }

    pub const fn state(&self) -> SessionState {
        if self.pending {
            SessionState::Awaiting
        } else {
            SessionState::Ready
        }
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    /// Record a user message and mark the session as awaiting a reply.
    ///
    /// On success the log has grown by exactly one user message carrying
    /// `text` unchanged, the input buffer is empty and the pending flag is
    /// set. On refusal nothing changes.
    pub fn begin_send(&mut self, text: &str) -> Result<PendingExchange, SendRejected> {
        if text.trim().is_empty() {
            return Err(SendRejected::EmptyInput);
        }
        if self.pending {
            return Err(SendRejected::Busy);
        }

        self.messages.push(Message::user(text));
        self.input.clear();
        self.pending = true;

        tracing::debug!(
            conversation_id = %self.conversation_id,
            generation = self.generation,
            "user message recorded"
        );

        Ok(PendingExchange {
            generation: self.generation,
            conversation_id: self.conversation_id.clone(),
            request: ChatRequest {
                message: text.to_string(),
                model: self.model,
            },
        })
    }

    /// Append the one assistant message answering `exchange` and clear the
    /// pending flag.
    ///
    /// Returns `None` and leaves the log alone when the session has no
    /// request in flight or `exchange` was issued by another generation.
    pub fn settle(
        &mut self,
        exchange: PendingExchange,
        outcome: Result<ChatReply, ExchangeError>,
    ) -> Option<&Message> {
        if !self.pending || exchange.generation != self.generation {
            tracing::debug!(
                conversation_id = %self.conversation_id,
                generation = exchange.generation,
                pending = self.pending,
                "no pending request for this reply"
            );
            return None;
        }

        let content = match outcome {
            Ok(reply) => reply.response,
            Err(err) => {
                tracing::warn!(
                    conversation_id = %self.conversation_id,
                    error = %err,
                    "chat request failed"
                );
                err.user_message()
            }
        };

        self.messages.push(Message::assistant(content));
        self.pending = false;

        self.messages.last()
    }

    /// Invoke a feedback affordance on a message.
    ///
    /// Feedback carries no behavior yet; the call is logged and the session is
    /// left untouched. Returns whether `message_id` names an assistant message.
    pub fn feedback(&self, message_id: &str, action: FeedbackAction) -> bool {
        let target = self
            .messages
            .iter()
            .find(|m| m.id == message_id && m.is_assistant());

        tracing::debug!(
            message_id,
            action = %action,
            found = target.is_some(),
            "feedback requested"
        );

        target.is_some()
    }
}
