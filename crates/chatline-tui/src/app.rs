//! Application state for the chat TUI.

use chatline_engine::{ChatError, ChatReply, Config, Conversation, IdGenerator, PendingRequest};
use crossterm::event::KeyEvent;
use std::path::PathBuf;
use tracing::{info, warn};

use crate::event::{key_to_action, Action};
use crate::export::{transcript_markdown, write_transcript};
use crate::theme::Theme;
use crate::widgets::TextInputState;

/// Lines moved per PageUp/PageDown.
const SCROLL_STEP: u16 = 5;

/// Main application state.
pub struct App {
    pub conversation: Conversation,
    pub input: TextInputState,
    pub config: Config,
    pub theme: Theme,
    /// Lines scrolled back from the newest message.
    pub scroll_offset: u16,
    pub spinner_frame: usize,
    /// One-shot message shown in the footer until the next key press.
    pub notification: Option<String>,
    /// Directory the transcript is exported to.
    pub export_dir: PathBuf,
    pub should_quit: bool,
}

impl App {
    /// Create the app with clock-based message ids.
    pub fn new(config: Config, export_dir: PathBuf) -> Self {
        let conversation = Conversation::new(config.greeting.clone());
        Self::with_conversation(conversation, config, export_dir)
    }

    /// Create the app with a specific id generator.
    pub fn with_ids(config: Config, export_dir: PathBuf, ids: impl IdGenerator + 'static) -> Self {
        let conversation = Conversation::with_ids(config.greeting.clone(), ids);
        Self::with_conversation(conversation, config, export_dir)
    }

    fn with_conversation(conversation: Conversation, config: Config, export_dir: PathBuf) -> Self {
        Self {
            conversation,
            input: TextInputState::new(),
            config,
            theme: Theme::default(),
            scroll_offset: 0,
            spinner_frame: 0,
            notification: None,
            export_dir,
            should_quit: false,
        }
    }

    /// Create an app with deterministic ids for tests.
    #[cfg(test)]
    pub fn new_for_test() -> Self {
        Self::with_ids(
            Config::default(),
            std::env::temp_dir(),
            chatline_engine::SequentialIds::default(),
        )
    }

    /// Handle a key press. Returns the request to send when the key submitted
    /// the draft.
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<PendingRequest> {
        self.handle_action(key_to_action(key))
    }

    /// Apply an action.
    pub fn handle_action(&mut self, action: Action) -> Option<PendingRequest> {
        self.notification = None;

        match action {
            Action::Quit => self.should_quit = true,
            Action::Submit => return self.submit(),
            Action::Export => self.export(),
            Action::ScrollUp => self.scroll_offset = self.scroll_offset.saturating_add(SCROLL_STEP),
            Action::ScrollDown => {
                self.scroll_offset = self.scroll_offset.saturating_sub(SCROLL_STEP);
            }
            Action::None => {}
            edit => self.edit(edit),
        }
        None
    }

    fn edit(&mut self, action: Action) {
        // The composer is disabled while a request is in flight
        if self.conversation.is_pending() {
            return;
        }

        match action {
            Action::Insert(c) => self.input.insert(c),
            Action::Backspace => self.input.backspace(),
            Action::Delete => self.input.delete(),
            Action::Left => self.input.move_left(),
            Action::Right => self.input.move_right(),
            Action::Home => self.input.move_home(),
            Action::End => self.input.move_end(),
            Action::HistoryPrev => self.input.history_prev(),
            Action::HistoryNext => self.input.history_next(),
            _ => return,
        }
        self.sync_draft();
    }

    fn sync_draft(&mut self) {
        if let Err(e) = self.conversation.update_draft(self.input.content()) {
            warn!(error = %e, "Draft update rejected");
        }
    }

    fn submit(&mut self) -> Option<PendingRequest> {
        let request = self.conversation.begin_submit().ok()?;
        self.input.submit();
        self.scroll_offset = 0;
        Some(request)
    }

    /// Feed the outcome of the in-flight request back into the conversation.
    pub fn resolve(&mut self, outcome: Result<ChatReply, ChatError>) {
        if let Err(e) = self.conversation.resolve(outcome) {
            warn!(error = %e, "Dropped chat outcome");
        }
        self.scroll_offset = 0;
    }

    /// Advance the spinner.
    pub fn tick(&mut self) {
        if self.conversation.is_pending() {
            self.spinner_frame = self.spinner_frame.wrapping_add(1);
        }
    }

    fn export(&mut self) {
        let markdown = transcript_markdown(&self.conversation, &self.config);
        match write_transcript(&self.export_dir, &markdown) {
            Ok(path) => {
                info!(path = %path.display(), "Exported transcript");
                self.notification = Some(format!("Transcript exported to {}", path.display()));
            }
            Err(e) => {
                warn!(error = %e, "Transcript export failed");
                self.notification = Some(format!("Export failed: {e}"));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatline_engine::{RequestStatus, SequentialIds, APOLOGY_MESSAGE};

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.handle_action(Action::Insert(c));
        }
    }

    #[test]
    fn test_starts_with_greeting() {
        let app = App::new_for_test();
        let messages = app.conversation.messages();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].text, app.config.greeting);
        assert!(!app.conversation.is_pending());
    }

    #[test]
    fn test_typing_updates_draft() {
        let mut app = App::new_for_test();
        type_text(&mut app, "helo");
        app.handle_action(Action::Left);
        app.handle_action(Action::Insert('l'));

        assert_eq!(app.input.content(), "hello");
        assert_eq!(app.conversation.state().draft(), "hello");
    }

    #[test]
    fn test_submit_returns_request_and_clears_input() {
        let mut app = App::new_for_test();
        type_text(&mut app, "  What is React?  ");

        let request = app.handle_action(Action::Submit).unwrap();

        assert_eq!(request.text, "What is React?");
        assert!(app.input.is_empty());
        assert!(app.conversation.is_pending());
        assert_eq!(app.conversation.messages().len(), 2);
    }

    #[test]
    fn test_submit_blank_does_nothing() {
        let mut app = App::new_for_test();
        type_text(&mut app, "   ");

        assert!(app.handle_action(Action::Submit).is_none());
        assert_eq!(app.input.content(), "   ");
        assert_eq!(app.conversation.messages().len(), 1);
    }

    #[test]
    fn test_edits_ignored_while_pending() {
        let mut app = App::new_for_test();
        type_text(&mut app, "first");
        app.handle_action(Action::Submit).unwrap();

        type_text(&mut app, "second");
        assert!(app.input.is_empty());
        assert!(app.handle_action(Action::Submit).is_none());
        assert_eq!(app.conversation.messages().len(), 2);
    }

    #[test]
    fn test_resolve_success_and_failure() {
        let mut app = App::new_for_test();
        type_text(&mut app, "hi");
        app.handle_action(Action::Submit).unwrap();
        app.resolve(Ok(ChatReply::new("hello there")));
        assert_eq!(app.conversation.state().status(), RequestStatus::Succeeded);
        assert_eq!(app.conversation.messages()[2].text, "hello there");

        type_text(&mut app, "again");
        app.handle_action(Action::Submit).unwrap();
        app.resolve(Err(ChatError::Transport(String::new())));
        assert_eq!(app.conversation.last_error(), Some("Something went wrong."));
        assert_eq!(app.conversation.messages()[4].text, APOLOGY_MESSAGE);
    }

    #[test]
    fn test_history_recall_syncs_draft() {
        let mut app = App::new_for_test();
        type_text(&mut app, "first");
        app.handle_action(Action::Submit).unwrap();
        app.resolve(Ok(ChatReply::new("ok")));

        app.handle_action(Action::HistoryPrev);
        assert_eq!(app.input.content(), "first");
        assert_eq!(app.conversation.state().draft(), "first");

        let request = app.handle_action(Action::Submit).unwrap();
        assert_eq!(request.text, "first");
    }

    #[test]
    fn test_scroll_and_quit() {
        let mut app = App::new_for_test();
        app.handle_action(Action::ScrollUp);
        app.handle_action(Action::ScrollUp);
        app.handle_action(Action::ScrollDown);
        assert_eq!(app.scroll_offset, SCROLL_STEP);
        app.handle_action(Action::ScrollDown);
        app.handle_action(Action::ScrollDown);
        assert_eq!(app.scroll_offset, 0);

        app.handle_action(Action::Quit);
        assert!(app.should_quit);
    }

    #[test]
    fn test_tick_only_spins_while_pending() {
        let mut app = App::new_for_test();
        app.tick();
        assert_eq!(app.spinner_frame, 0);

        type_text(&mut app, "hi");
        app.handle_action(Action::Submit).unwrap();
        app.tick();
        app.tick();
        assert_eq!(app.spinner_frame, 2);
    }

    #[test]
    fn test_export_writes_file_and_notifies() {
        let temp = tempfile::tempdir().unwrap();
        let mut app = App::with_ids(
            Config::default(),
            temp.path().to_path_buf(),
            SequentialIds::default(),
        );

        app.handle_action(Action::Export);

        let path = temp.path().join(crate::export::EXPORT_FILE_NAME);
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("# AI Chatbot Transcript"));
        assert!(app.notification.as_deref().unwrap().contains("exported"));

        // Cleared on the next key
        app.handle_action(Action::None);
        assert!(app.notification.is_none());
    }
}
