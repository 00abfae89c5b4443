//! Failures of a single chat exchange.

use serde_json::Value;

/// Used when an error body cannot be parsed at all.
pub const UNKNOWN_ERROR: &str = "Unknown error";

/// Used when an error body parses but carries no `detail`.
pub const MISSING_DETAIL: &str = "Network response was not ok";

/// Why a chat request did not produce a reply.
#[derive(Debug, thiserror::Error)]
pub enum ExchangeError {
    /// The service answered with a non-2xx status.
    #[error("assistant service returned {status}: {detail}")]
    Status { status: u16, detail: String },
    /// The request never completed (connection refused, timeout, reset).
    #[error("could not reach the assistant service: {0}")]
    Transport(String),
    /// A 2xx answer whose body is not a chat reply.
    #[error("malformed reply from assistant service: {0}")]
    MalformedReply(String),
}

impl ExchangeError {
    /// Build a status error from a raw response body.
    pub fn from_status(status: u16, body: &str) -> Self {
        Self::Status {
            status,
            detail: detail_from_body(body),
        }
    }

    /// Text shown to the user in place of an assistant reply.
    pub fn user_message(&self) -> String {
        match self {
            Self::Status { detail, .. } => detail.clone(),
            Self::Transport(cause) => format!("Could not reach the assistant service: {cause}"),
            Self::MalformedReply(_) => {
                "The assistant service sent a reply that could not be read.".to_string()
            }
        }
    }
}

/// Best-effort extraction of the `detail` field of an error body.
fn detail_from_body(body: &str) -> String {
    let Ok(value) = serde_json::from_str::<Value>(body) else {
        return UNKNOWN_ERROR.to_string();
    };

    match value.get("detail") {
        Some(Value::String(detail)) if !detail.is_empty() => detail.clone(),
        // Validation errors carry a list of problems; show them as JSON.
        Some(detail @ (Value::Array(_) | Value::Object(_) | Value::Bool(true))) => {
            detail.to_string()
        }
        Some(Value::Number(n)) if n.as_f64().is_some_and(|f| f.abs() > 0.0) => n.to_string(),
        _ => MISSING_DETAIL.to_string(),
    }
}
