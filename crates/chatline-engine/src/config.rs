//! Configuration for chatline.
//!
//! Every field has a default, so an empty JSON object (or no file at all)
//! is a valid configuration.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::message::DEFAULT_GREETING;

/// Main configuration for chatline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Root URL of the chat service; requests go to `<backend_url>/chat`.
    #[serde(default = "default_backend_url")]
    pub backend_url: String,

    /// Text of the bot message the conversation opens with.
    #[serde(default = "default_greeting")]
    pub greeting: String,

    /// Label shown above bot messages.
    #[serde(default = "default_assistant_name")]
    pub assistant_name: String,

    /// Label shown above user messages.
    #[serde(default = "default_user_name")]
    pub user_name: String,

    /// Title shown in the header.
    #[serde(default = "default_title")]
    pub title: String,

    /// Hint shown in the empty input box.
    #[serde(default = "default_placeholder")]
    pub placeholder: String,
}

fn default_backend_url() -> String {
    "http://localhost:8000".into()
}

fn default_greeting() -> String {
    DEFAULT_GREETING.into()
}

fn default_assistant_name() -> String {
    "Gemini".into()
}

fn default_user_name() -> String {
    "You".into()
}

fn default_title() -> String {
    "AI Chatbot".into()
}

fn default_placeholder() -> String {
    "Ask about FastAPI, React, or Gemini...".into()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend_url: default_backend_url(),
            greeting: default_greeting(),
            assistant_name: default_assistant_name(),
            user_name: default_user_name(),
            title: default_title(),
            placeholder: default_placeholder(),
        }
    }
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        serde_json::from_str(&content).map_err(ConfigError::Parse)
    }

    /// Load configuration from a file, falling back to defaults if it is missing.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Save configuration to a file.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self).map_err(ConfigError::Serialize)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(ConfigError::Io)?;
        }
        std::fs::write(path, content).map_err(ConfigError::Io)
    }

    /// Check that the backend URL is an absolute http(s) URL.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = reqwest::Url::parse(&self.backend_url)
            .map_err(|_| ConfigError::InvalidBackendUrl(self.backend_url.clone()))?;
        match url.scheme() {
            "http" | "https" if url.has_host() => Ok(()),
            _ => Err(ConfigError::InvalidBackendUrl(self.backend_url.clone())),
        }
    }

    /// The endpoint chat messages are posted to.
    pub fn chat_url(&self) -> String {
        crate::http::chat_url(&self.backend_url)
    }
}

/// Errors that can occur when working with configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// I/O error reading or writing config.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error parsing config JSON.
    #[error("Parse error: {0}")]
    Parse(#[source] serde_json::Error),

    /// Error serializing config to JSON.
    #[error("Serialize error: {0}")]
    Serialize(#[source] serde_json::Error),

    /// The backend URL is not an absolute http(s) URL.
    #[error("Invalid backend URL: {0}")]
    InvalidBackendUrl(String),
}
