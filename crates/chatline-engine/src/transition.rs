//! Pure state transition function.
//!
//! Every change to a [`ConversationState`] goes through [`transition`]. It
//! performs no I/O: sending the chat request is returned as an [`Effect`]
//! for the caller to execute, and its outcome comes back as another
//! [`Event`].

use thiserror::Error;

use crate::backend::APOLOGY_MESSAGE;
use crate::ids::IdGenerator;
use crate::message::Message;
use crate::state::{ConversationState, RequestStatus};

/// Events that drive the conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// The input text changed.
    EditDraft { text: String },
    /// The user asked to send the draft.
    SubmitStarted,
    /// The backend replied.
    SubmitSucceeded { reply: String },
    /// The exchange failed; `detail` is shown to the user.
    SubmitFailed { detail: String },
}

/// Work the caller must perform after a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Send `text` to the chat backend and report back with
    /// [`Event::SubmitSucceeded`] or [`Event::SubmitFailed`].
    SendMessage { text: String },
}

/// Reasons an event is rejected. A rejected event leaves the state untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("Nothing to send: the draft is empty")]
    EmptyDraft,
    #[error("A request is already in flight")]
    Busy,
    #[error("No request is in flight")]
    NotPending,
}

/// Apply `event` to `state`, returning the effects to execute.
pub fn transition(
    state: &mut ConversationState,
    ids: &mut dyn IdGenerator,
    event: Event,
) -> Result<Vec<Effect>, TransitionError> {
    match event {
        Event::EditDraft { text } => {
            if state.is_pending() {
                return Err(TransitionError::Busy);
            }
            state.draft = text;
            Ok(vec![])
        }

        Event::SubmitStarted => {
            if state.is_pending() {
                return Err(TransitionError::Busy);
            }
            let text = state.draft.trim().to_string();
            if text.is_empty() {
                return Err(TransitionError::EmptyDraft);
            }

            state.messages.push(Message::user(ids.next_id(), text.clone()));
            state.draft.clear();
            state.last_error = None;
            state.status = RequestStatus::Pending;
            Ok(vec![Effect::SendMessage { text }])
        }

        Event::SubmitSucceeded { reply } => {
            if !state.is_pending() {
                return Err(TransitionError::NotPending);
            }
            state.messages.push(Message::bot(ids.next_id(), reply));
            state.status = RequestStatus::Succeeded;
            Ok(vec![])
        }

        Event::SubmitFailed { detail } => {
            if !state.is_pending() {
                return Err(TransitionError::NotPending);
            }
            state.last_error = Some(detail);
            state.messages.push(Message::bot(ids.next_id(), APOLOGY_MESSAGE));
            state.status = RequestStatus::Failed;
            Ok(vec![])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::SequentialIds;
    use crate::message::{Sender, DEFAULT_GREETING};

    fn setup() -> (ConversationState, SequentialIds) {
        (ConversationState::new(DEFAULT_GREETING), SequentialIds::default())
    }

    fn edit(text: &str) -> Event {
        Event::EditDraft { text: text.into() }
    }

    #[test]
    fn test_edit_draft_sets_text() {
        let (mut state, mut ids) = setup();
        let effects = transition(&mut state, &mut ids, edit("hello")).unwrap();
        assert!(effects.is_empty());
        assert_eq!(state.draft(), "hello");
        assert_eq!(state.messages().len(), 1);
    }

    #[test]
    fn test_submit_appends_trimmed_user_message() {
        let (mut state, mut ids) = setup();
        transition(&mut state, &mut ids, edit("  what is rust?  ")).unwrap();
        state.last_error = Some("old".into());

        let effects = transition(&mut state, &mut ids, Event::SubmitStarted).unwrap();

        assert_eq!(
            effects,
            vec![Effect::SendMessage {
                text: "what is rust?".into()
            }]
        );
        let last = state.messages().last().unwrap();
        assert_eq!(last.sender, Sender::User);
        assert_eq!(last.text, "what is rust?");
        assert_eq!(state.draft(), "");
        assert_eq!(state.last_error(), None);
        assert!(state.is_pending());
    }

    #[test]
    fn test_submit_whitespace_is_rejected() {
        let (mut state, mut ids) = setup();
        transition(&mut state, &mut ids, edit(" \t\n ")).unwrap();

        let result = transition(&mut state, &mut ids, Event::SubmitStarted);

        assert_eq!(result, Err(TransitionError::EmptyDraft));
        assert_eq!(state.messages().len(), 1);
        assert_eq!(state.draft(), " \t\n ");
        assert_eq!(state.status(), RequestStatus::Idle);
    }

    #[test]
    fn test_submit_while_pending_is_rejected() {
        let (mut state, mut ids) = setup();
        transition(&mut state, &mut ids, edit("first")).unwrap();
        transition(&mut state, &mut ids, Event::SubmitStarted).unwrap();

        assert_eq!(
            transition(&mut state, &mut ids, edit("second")),
            Err(TransitionError::Busy)
        );
        assert_eq!(
            transition(&mut state, &mut ids, Event::SubmitStarted),
            Err(TransitionError::Busy)
        );
        assert_eq!(state.messages().len(), 2);
    }

    #[test]
    fn test_success_appends_reply_and_clears_pending() {
        let (mut state, mut ids) = setup();
        transition(&mut state, &mut ids, edit("hi")).unwrap();
        transition(&mut state, &mut ids, Event::SubmitStarted).unwrap();

        transition(
            &mut state,
            &mut ids,
            Event::SubmitSucceeded { reply: "X".into() },
        )
        .unwrap();

        let last = state.messages().last().unwrap();
        assert_eq!(last.sender, Sender::Bot);
        assert_eq!(last.text, "X");
        assert_ne!(last.id, state.messages()[1].id);
        assert_eq!(state.status(), RequestStatus::Succeeded);
        assert!(!state.is_pending());
    }

    #[test]
    fn test_failure_records_detail_and_apologizes() {
        let (mut state, mut ids) = setup();
        transition(&mut state, &mut ids, edit("hi")).unwrap();
        transition(&mut state, &mut ids, Event::SubmitStarted).unwrap();

        transition(
            &mut state,
            &mut ids,
            Event::SubmitFailed {
                detail: "bad input".into(),
            },
        )
        .unwrap();

        assert_eq!(state.last_error(), Some("bad input"));
        assert_eq!(state.messages().last().unwrap().text, APOLOGY_MESSAGE);
        assert_eq!(state.status(), RequestStatus::Failed);

        // Usable again afterwards
        transition(&mut state, &mut ids, edit("again")).unwrap();
        assert!(transition(&mut state, &mut ids, Event::SubmitStarted).is_ok());
        assert_eq!(state.last_error(), None);
    }

    #[test]
    fn test_resolution_without_request_is_rejected() {
        let (mut state, mut ids) = setup();
        assert_eq!(
            transition(
                &mut state,
                &mut ids,
                Event::SubmitSucceeded { reply: "x".into() }
            ),
            Err(TransitionError::NotPending)
        );
        assert_eq!(
            transition(
                &mut state,
                &mut ids,
                Event::SubmitFailed { detail: "x".into() }
            ),
            Err(TransitionError::NotPending)
        );
        assert_eq!(state.messages().len(), 1);
    }
}
