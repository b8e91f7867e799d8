//! HTTP chat backend.
//!
//! Talks to `POST <base_url>/chat` with `{"message": ...}` and expects
//! `{"reply": ...}` back.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::backend::{ChatBackend, ChatError, ChatReply};

#[derive(Serialize)]
struct ChatRequest<'a> {
    message: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    reply: String,
}

/// [`ChatBackend`] that reaches the chat service over HTTP.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    chat_url: String,
}

impl HttpBackend {
    /// Create a backend for the service rooted at `base_url`.
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            chat_url: chat_url(base_url),
        }
    }

    /// The full URL requests are posted to.
    pub fn chat_url(&self) -> &str {
        &self.chat_url
    }
}

/// Join a base URL and the `/chat` path without doubling the slash.
pub fn chat_url(base_url: &str) -> String {
    format!("{}/chat", base_url.trim_end_matches('/'))
}

#[async_trait]
impl ChatBackend for HttpBackend {
    async fn send(&self, message: &str) -> Result<ChatReply, ChatError> {
        debug!(url = %self.chat_url, chars = message.chars().count(), "Posting chat message");

        let response = self
            .client
            .post(&self.chat_url)
            .json(&ChatRequest { message })
            .send()
            .await
            .map_err(|e| ChatError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ChatError::Transport(e.to_string()))?;

        if !status.is_success() {
            let err = ChatError::from_response(status.as_u16(), &body);
            warn!(status = status.as_u16(), detail = err.detail(), "Chat backend returned an error");
            return Err(err);
        }

        let parsed: ChatResponse = serde_json::from_str(&body).map_err(|e| {
            warn!(error = %e, "Chat backend reply could not be parsed");
            ChatError::MalformedReply(e.to_string())
        })?;

        debug!(chars = parsed.reply.chars().count(), "Received chat reply");
        Ok(ChatReply::new(parsed.reply))
    }
}
