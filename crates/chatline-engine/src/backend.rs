//! Chat backend abstraction.
//!
//! The conversation state machine never talks to the network directly. It
//! emits a send effect and is later fed the outcome of [`ChatBackend::send`],
//! which lets tests drive it with fakes.

use async_trait::async_trait;
use serde_json::Value;

/// Detail shown when the backend fails without saying why.
pub const UNEXPECTED_BACKEND_ERROR: &str = "Unexpected error from backend.";

/// Detail shown when the request failed and no message is available.
pub const GENERIC_ERROR: &str = "Something went wrong.";

/// Bot message appended to the transcript whenever an exchange fails.
pub const APOLOGY_MESSAGE: &str = "Sorry, I ran into an error reaching the server.";

/// A successful reply from the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatReply {
    /// Text to show as the bot message, verbatim.
    pub reply: String,
}

impl ChatReply {
    /// Wrap a reply text.
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
        }
    }
}

/// Ways a chat exchange can fail.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChatError {
    /// The request never produced a response.
    #[error("transport error: {0}")]
    Transport(String),

    /// The backend answered with a non-success status.
    #[error("backend returned {status}: {detail}")]
    Server {
        /// HTTP status code.
        status: u16,
        /// Human-readable detail taken from the body, or the fallback.
        detail: String,
    },

    /// The backend answered with success but the body had no usable reply.
    #[error("malformed reply: {0}")]
    MalformedReply(String),
}

impl ChatError {
    /// Build a server error from a status code and raw response body.
    pub fn from_response(status: u16, body: &str) -> Self {
        Self::Server {
            status,
            detail: extract_detail(body).unwrap_or_else(|| UNEXPECTED_BACKEND_ERROR.to_string()),
        }
    }

    /// The text surfaced to the user as the last error.
    pub fn detail(&self) -> &str {
        match self {
            Self::Transport(message) if message.trim().is_empty() => GENERIC_ERROR,
            Self::Transport(message) => message,
            Self::Server { detail, .. } => detail,
            Self::MalformedReply(_) => UNEXPECTED_BACKEND_ERROR,
        }
    }
}

/// Pull a human-readable detail out of an error response body.
///
/// Accepts `{"detail": "..."}` and the validation shape
/// `{"detail": [{"msg": "..."}, ...]}`, whose messages are joined with `"; "`.
pub fn extract_detail(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    match value.get("detail")? {
        Value::String(detail) if !detail.trim().is_empty() => Some(detail.clone()),
        Value::Array(items) => {
            let messages: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(Value::as_str))
                .filter(|msg| !msg.trim().is_empty())
                .collect();
            if messages.is_empty() {
                None
            } else {
                Some(messages.join("; "))
            }
        }
        _ => None,
    }
}

/// Something that can carry one chat message to the backend and back.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Send one user message and wait for the reply.
    async fn send(&self, message: &str) -> Result<ChatReply, ChatError>;
}
