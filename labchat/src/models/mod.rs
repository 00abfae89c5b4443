//! Data models for labchat entities.

mod chat_model;
mod conversation;
mod feedback;
mod message;

pub use chat_model::ChatModel;
pub use conversation::Conversation;
pub use feedback::FeedbackAction;
pub use message::{Message, MessageRole};

/// Generate a UUIDv7 (time-ordered, globally unique).
pub fn generate_id() -> String {
    uuid::Uuid::now_v7().to_string()
}
