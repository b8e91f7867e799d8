//! Transcript messages.
//!
//! Messages are immutable once created and only ever appended to the
//! conversation, so display order is insertion order.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Text of the bot message every conversation starts with.
pub const DEFAULT_GREETING: &str = "Hi! I am your AI Assistant";

/// Id reserved for the greeting message.
pub const GREETING_ID: MessageId = MessageId(1);

/// Unique identifier of a message within a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(pub u64);

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Who authored a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    /// Typed by the person at the keyboard.
    User,
    /// Produced by the backend, or the client on the backend's behalf.
    Bot,
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Bot => write!(f, "bot"),
        }
    }
}

/// A single transcript entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Unique id.
    pub id: MessageId,
    /// Author of the message.
    pub sender: Sender,
    /// Message body, shown verbatim.
    pub text: String,
    /// When the message was created.
    pub created_at: DateTime<Utc>,
}

impl Message {
    /// Create a user message.
    pub fn user(id: MessageId, text: impl Into<String>) -> Self {
        Self::new(id, Sender::User, text)
    }

    /// Create a bot message.
    pub fn bot(id: MessageId, text: impl Into<String>) -> Self {
        Self::new(id, Sender::Bot, text)
    }

    /// The greeting the conversation is seeded with.
    pub fn greeting(text: impl Into<String>) -> Self {
        Self::bot(GREETING_ID, text)
    }

    fn new(id: MessageId, sender: Sender, text: impl Into<String>) -> Self {
        Self {
            id,
            sender,
            text: text.into(),
            created_at: Utc::now(),
        }
    }

    /// Check whether the message was authored by the user.
    pub fn is_user(&self) -> bool {
        self.sender == Sender::User
    }
}
