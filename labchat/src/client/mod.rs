//! Outbound seam to the remote assistant service.
//!
//! The session layer only sees [`AssistantClient`]; the reqwest-backed
//! [`HttpAssistantClient`] is what the CLI wires in.

pub mod error;
mod http;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::models::ChatModel;

pub use error::ExchangeError;
pub use http::{ClientConfig, HttpAssistantClient, DEFAULT_ENDPOINT};

/// Body of `POST /chat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    pub model: ChatModel,
}

/// Successful body of `POST /chat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatReply {
    pub response: String,
}

/// Something that can answer a chat request.
#[async_trait]
pub trait AssistantClient: Send + Sync {
    async fn chat(&self, request: &ChatRequest) -> Result<ChatReply, ExchangeError>;
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_serializes_wire_model_name() {
        let request = ChatRequest {
            message: "Hello".to_string(),
            model: ChatModel::Claude3Haiku,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"message": "Hello", "model": "claude-3-haiku"})
        );
    }
}
