//! Plain-text rendering of conversations and messages.

use crate::models::{ChatModel, Conversation, Message, MessageRole};
use crate::session::ASSISTANT_NAME;

/// One log entry: header line, body, and the feedback row for replies.
pub fn message(position: usize, message: &Message) -> String {
    let sender = match message.role {
        MessageRole::Assistant => ASSISTANT_NAME,
        MessageRole::User => "You",
    };
    let mut out = format!("[{position}] {sender}  {}\n{}", message.timestamp, message.content);

    let actions = message.feedback_actions();
    if !actions.is_empty() {
        let names: Vec<_> = actions.iter().map(|a| a.as_str()).collect();
        out.push_str(&format!("\n    ({})", names.join(" | ")));
    }
    out
}

/// The whole log of a session, oldest first.
pub fn history(messages: &[Message]) -> String {
    messages
        .iter()
        .enumerate()
        .map(|(i, m)| message(i + 1, m))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Sidebar listing with the active conversation marked.
pub fn conversations(conversations: &[Conversation], active: Option<&str>) -> String {
    if conversations.is_empty() {
        return "No conversations yet. Use /new to start one.".to_string();
    }

    let mut out = format!("{:<4} {:<10} {}\n{}", "#", "ID", "NAME", "-".repeat(40));
    for (i, conversation) in conversations.iter().enumerate() {
        let marker = if Some(conversation.id.as_str()) == active {
            "*"
        } else {
            " "
        };
        out.push_str(&format!(
            "\n{marker}{:<3} {:<10} {}",
            i + 1,
            conversation.short_id(),
            conversation.name
        ));
    }
    out
}

pub fn models(current: ChatModel) -> String {
    ChatModel::ALL
        .iter()
        .map(|m| {
            let marker = if *m == current { "*" } else { " " };
            format!("{marker} {:<18} {}", m.as_str(), m.label())
        })
        .collect::<Vec<_>>()
        .join("\n")
}
