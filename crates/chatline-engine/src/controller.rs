//! Conversation controller.
//!
//! Wraps [`ConversationState`] and an [`IdGenerator`] and exposes the
//! operations a front end needs. The request itself is split in two halves,
//! [`Conversation::begin_submit`] and [`Conversation::resolve`], so an event
//! loop can run the network call in the background and feed the outcome back
//! when it completes. [`Conversation::submit`] does both for callers that can
//! simply await.

use tracing::{debug, info, warn};

use crate::backend::{ChatBackend, ChatError, ChatReply};
use crate::ids::{ClockIds, IdGenerator};
use crate::message::Message;
use crate::state::{ConversationState, RequestStatus};
use crate::transition::{transition, Effect, Event, TransitionError};

/// A request the caller must deliver to the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRequest {
    /// Trimmed user text, sent as the `message` field.
    pub text: String,
}

/// The single conversation shown by the client.
pub struct Conversation {
    state: ConversationState,
    ids: Box<dyn IdGenerator>,
}

impl std::fmt::Debug for Conversation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Conversation")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl Conversation {
    /// Create a conversation using clock-based message ids.
    pub fn new(greeting: impl Into<String>) -> Self {
        Self::with_ids(greeting, ClockIds::new())
    }

    /// Create a conversation with a specific id generator.
    pub fn with_ids(greeting: impl Into<String>, ids: impl IdGenerator + 'static) -> Self {
        Self {
            state: ConversationState::new(greeting),
            ids: Box::new(ids),
        }
    }

    /// Current state.
    pub fn state(&self) -> &ConversationState {
        &self.state
    }

    /// Messages in display order.
    pub fn messages(&self) -> &[Message] {
        self.state.messages()
    }

    /// Whether a request is in flight.
    pub fn is_pending(&self) -> bool {
        self.state.is_pending()
    }

    /// Detail of the last failed exchange.
    pub fn last_error(&self) -> Option<&str> {
        self.state.last_error()
    }

    /// Replace the draft. Rejected while a request is in flight.
    pub fn update_draft(&mut self, text: impl Into<String>) -> Result<(), TransitionError> {
        self.apply(Event::EditDraft { text: text.into() })
            .map(|_| ())
    }

    /// Commit the draft as a user message and mark the conversation pending.
    ///
    /// Returns the request to send. Empty drafts and submits while pending are
    /// rejected without touching the state.
    pub fn begin_submit(&mut self) -> Result<PendingRequest, TransitionError> {
        let effects = self.apply(Event::SubmitStarted).inspect_err(|e| {
            debug!(reason = %e, "Submit ignored");
        })?;

        let text = effects
            .into_iter()
            .map(|Effect::SendMessage { text }| text)
            .next()
            .unwrap_or_default();

        info!(chars = text.chars().count(), "Submitting chat message");
        Ok(PendingRequest { text })
    }

    /// Feed the outcome of the in-flight request back into the conversation.
    pub fn resolve(
        &mut self,
        outcome: Result<ChatReply, ChatError>,
    ) -> Result<(), TransitionError> {
        let event = match outcome {
            Ok(reply) => {
                info!("Chat exchange succeeded");
                Event::SubmitSucceeded { reply: reply.reply }
            }
            Err(err) => {
                warn!(error = %err, "Chat exchange failed");
                Event::SubmitFailed {
                    detail: err.detail().to_string(),
                }
            }
        };
        self.apply(event).map(|_| ())
    }

    /// Submit the draft and wait for the backend's answer.
    ///
    /// Returns the final request status. There is no timeout: if the backend
    /// never answers, neither does this future.
    pub async fn submit(
        &mut self,
        backend: &dyn ChatBackend,
    ) -> Result<RequestStatus, TransitionError> {
        let request = self.begin_submit()?;
        let outcome = backend.send(&request.text).await;
        self.resolve(outcome)?;
        Ok(self.state.status())
    }

    fn apply(&mut self, event: Event) -> Result<Vec<Effect>, TransitionError> {
        transition(&mut self.state, self.ids.as_mut(), event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::APOLOGY_MESSAGE;
    use crate::ids::SequentialIds;
    use crate::message::{Sender, DEFAULT_GREETING};
    use async_trait::async_trait;
    use std::collections::{HashSet, VecDeque};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Backend that replays canned outcomes and counts calls.
    #[derive(Default)]
    struct FakeBackend {
        outcomes: Mutex<VecDeque<Result<ChatReply, ChatError>>>,
        sent: Mutex<Vec<String>>,
        calls: AtomicUsize,
    }

    impl FakeBackend {
        fn with(outcomes: Vec<Result<ChatReply, ChatError>>) -> Self {
            Self {
                outcomes: Mutex::new(outcomes.into()),
                ..Default::default()
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ChatBackend for FakeBackend {
        async fn send(&self, message: &str) -> Result<ChatReply, ChatError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.sent.lock().unwrap().push(message.to_string());
            self.outcomes
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(ChatReply::new("default")))
        }
    }

    fn conversation() -> Conversation {
        Conversation::with_ids(DEFAULT_GREETING, SequentialIds::default())
    }

    #[tokio::test]
    async fn test_round_trip_success() {
        let backend = FakeBackend::with(vec![Ok(ChatReply::new("X"))]);
        let mut conv = conversation();
        conv.update_draft("  hello  ").unwrap();

        let status = conv.submit(&backend).await.unwrap();

        assert_eq!(status, RequestStatus::Succeeded);
        assert_eq!(backend.sent.lock().unwrap().as_slice(), ["hello"]);
        let texts: Vec<_> = conv.messages().iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, [DEFAULT_GREETING, "hello", "X"]);
        assert_eq!(conv.messages()[2].sender, Sender::Bot);
        assert!(!conv.is_pending());
        assert_eq!(conv.last_error(), None);
    }

    #[tokio::test]
    async fn test_server_detail_is_surfaced_not_appended() {
        let backend = FakeBackend::with(vec![Err(ChatError::from_response(
            400,
            r#"{"detail": "bad input"}"#,
        ))]);
        let mut conv = conversation();
        conv.update_draft("hello").unwrap();

        let status = conv.submit(&backend).await.unwrap();

        assert_eq!(status, RequestStatus::Failed);
        assert_eq!(conv.last_error(), Some("bad input"));
        assert_eq!(conv.messages().last().unwrap().text, APOLOGY_MESSAGE);
        assert!(!conv.is_pending());
    }

    #[tokio::test]
    async fn test_unparsable_failure_uses_fallback() {
        let backend = FakeBackend::with(vec![Err(ChatError::from_response(500, ""))]);
        let mut conv = conversation();
        conv.update_draft("hello").unwrap();
        conv.submit(&backend).await.unwrap();
        assert_eq!(conv.last_error(), Some("Unexpected error from backend."));
    }

    #[tokio::test]
    async fn test_transport_failure() {
        let backend = FakeBackend::with(vec![
            Err(ChatError::Transport(String::new())),
            Err(ChatError::Transport("connection refused".into())),
        ]);
        let mut conv = conversation();

        conv.update_draft("one").unwrap();
        conv.submit(&backend).await.unwrap();
        assert_eq!(conv.last_error(), Some("Something went wrong."));

        conv.update_draft("two").unwrap();
        conv.submit(&backend).await.unwrap();
        assert_eq!(conv.last_error(), Some("connection refused"));
    }

    #[tokio::test]
    async fn test_empty_draft_sends_nothing() {
        let backend = FakeBackend::default();
        let mut conv = conversation();
        conv.update_draft("   ").unwrap();

        let result = conv.submit(&backend).await;

        assert_eq!(result, Err(TransitionError::EmptyDraft));
        assert_eq!(backend.calls(), 0);
        assert_eq!(conv.messages().len(), 1);
    }

    #[test]
    fn test_user_message_visible_before_resolution() {
        let mut conv = conversation();
        conv.update_draft("hello").unwrap();

        let request = conv.begin_submit().unwrap();

        assert_eq!(request.text, "hello");
        assert!(conv.is_pending());
        assert_eq!(conv.messages().len(), 2);
        assert!(conv.messages()[1].is_user());
        assert_eq!(conv.state().draft(), "");
    }

    #[test]
    fn test_second_submit_while_pending_is_noop() {
        let mut conv = conversation();
        conv.update_draft("hello").unwrap();
        conv.begin_submit().unwrap();

        assert_eq!(conv.update_draft("again"), Err(TransitionError::Busy));
        assert_eq!(conv.begin_submit(), Err(TransitionError::Busy));
        assert_eq!(conv.messages().len(), 2);

        conv.resolve(Ok(ChatReply::new("done"))).unwrap();
        assert_eq!(conv.messages().len(), 3);
        assert_eq!(
            conv.resolve(Ok(ChatReply::new("late"))),
            Err(TransitionError::NotPending)
        );
        assert_eq!(conv.messages().len(), 3);
    }

    #[tokio::test]
    async fn test_ids_unique_across_many_exchanges() {
        let outcomes = (0..40)
            .map(|i| {
                if i % 3 == 0 {
                    Err(ChatError::Transport("down".into()))
                } else {
                    Ok(ChatReply::new(format!("reply {i}")))
                }
            })
            .collect();
        let backend = FakeBackend::with(outcomes);
        // Clock ids exercise the same-millisecond bump path
        let mut conv = Conversation::new(DEFAULT_GREETING);

        for i in 0..40 {
            conv.update_draft(format!("message {i}")).unwrap();
            conv.submit(&backend).await.unwrap();
        }

        assert_eq!(conv.messages().len(), 81);
        let ids: HashSet<_> = conv.messages().iter().map(|m| m.id).collect();
        assert_eq!(ids.len(), conv.messages().len());
        assert_eq!(backend.calls(), 40);
    }
}
