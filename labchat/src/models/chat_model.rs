//! Assistant model identifiers understood by the chat service.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Which backend assistant variant handles a request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChatModel {
    /// Local small reasoning model served through Ollama.
    #[default]
    #[serde(rename = "deepseek-r1:1.5b")]
    DeepseekR1,
    /// Hosted haiku-tier model.
    #[serde(rename = "claude-3-haiku")]
    Claude3Haiku,
}

impl ChatModel {
    pub const ALL: [Self; 2] = [Self::DeepseekR1, Self::Claude3Haiku];

    /// Identifier sent on the wire.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DeepseekR1 => "deepseek-r1:1.5b",
            Self::Claude3Haiku => "claude-3-haiku",
        }
    }

    /// Human-readable label.
    pub const fn label(self) -> &'static str {
        match self {
            Self::DeepseekR1 => "Deepseek R1 1.5B",
            Self::Claude3Haiku => "Claude 3 Haiku",
        }
    }
}

impl std::fmt::Display for ChatModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Returned when a string names no supported model.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported model '{0}' (expected one of: deepseek-r1:1.5b, claude-3-haiku)")]
pub struct UnknownModel(pub String);

impl FromStr for ChatModel {
    type Err = UnknownModel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "deepseek-r1:1.5b" | "deepseek" => Ok(Self::DeepseekR1),
            "claude-3-haiku" | "haiku" => Ok(Self::Claude3Haiku),
            other => Err(UnknownModel(other.to_string())),
        }
    }
}
