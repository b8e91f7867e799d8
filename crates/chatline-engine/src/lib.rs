//! chatline-engine: Headless core of the chatline chat client
//!
//! This crate provides everything below the user interface:
//! - The message model and id generation
//! - Conversation state and its pure transition function
//! - The conversation controller that drives one request at a time
//! - The chat backend trait and its HTTP implementation
//! - Configuration

pub mod backend;
pub mod config;
pub mod controller;
pub mod http;
pub mod ids;
pub mod message;
pub mod state;
pub mod transition;

// Re-export commonly used types
pub use backend::{
    extract_detail, ChatBackend, ChatError, ChatReply, APOLOGY_MESSAGE, GENERIC_ERROR,
    UNEXPECTED_BACKEND_ERROR,
};
pub use config::{Config, ConfigError};
pub use controller::{Conversation, PendingRequest};
pub use http::HttpBackend;
pub use ids::{ClockIds, IdGenerator, SequentialIds};
pub use message::{Message, MessageId, Sender, DEFAULT_GREETING};
pub use state::{ConversationState, RequestStatus};
pub use transition::{transition, Effect, Event, TransitionError};

/// Returns the engine version.
pub fn engine_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
