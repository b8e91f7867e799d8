//! Conversation state.
//!
//! The state is only changed through [`crate::transition::transition`].

use serde::{Deserialize, Serialize};

use crate::message::Message;

/// Lifecycle of the most recent chat request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    /// Nothing has been sent yet.
    #[default]
    Idle,
    /// One request is in flight.
    Pending,
    /// The last request produced a reply.
    Succeeded,
    /// The last request failed.
    Failed,
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Pending => write!(f, "pending"),
            Self::Succeeded => write!(f, "succeeded"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// Everything the conversation view renders.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationState {
    pub(crate) messages: Vec<Message>,
    pub(crate) draft: String,
    pub(crate) status: RequestStatus,
    pub(crate) last_error: Option<String>,
}

impl ConversationState {
    /// Create a state seeded with the greeting bot message.
    pub fn new(greeting: impl Into<String>) -> Self {
        Self {
            messages: vec![Message::greeting(greeting)],
            draft: String::new(),
            status: RequestStatus::Idle,
            last_error: None,
        }
    }

    /// Messages in display order.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// The uncommitted input text.
    pub fn draft(&self) -> &str {
        &self.draft
    }

    /// Status of the most recent request.
    pub fn status(&self) -> RequestStatus {
        self.status
    }

    /// Whether a request is in flight.
    pub fn is_pending(&self) -> bool {
        self.status == RequestStatus::Pending
    }

    /// Detail of the last failed exchange, cleared on the next submit.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Whether the draft holds anything worth sending.
    pub fn can_submit(&self) -> bool {
        !self.is_pending() && !self.draft.trim().is_empty()
    }
}
