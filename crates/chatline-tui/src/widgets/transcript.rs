//! Transcript widget.
//!
//! Renders the message list, newest at the bottom, with a "Thinking..."
//! bubble while a request is in flight.
//!
//! ```text
//! ┌ Conversation ────────────────────────┐
//! │Gemini                                │
//! │  Hi! I am your AI Assistant          │
//! │                                      │
//! │You                                   │
//! │  What is Rust?                       │
//! │                                      │
//! │Gemini                                │
//! │  | Thinking...                       │
//! └──────────────────────────────────────┘
//! ```

use chatline_engine::{Message, Sender};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use crate::text::wrap_text;
use crate::theme::{Theme, SPINNER};

/// Indentation of message bodies under their label.
const BODY_INDENT: &str = "  ";

/// Scrollable view over the conversation's messages.
pub struct TranscriptView<'a> {
    messages: &'a [Message],
    theme: &'a Theme,
    user_name: &'a str,
    assistant_name: &'a str,
    pending: bool,
    spinner_frame: usize,
    scroll_offset: u16,
}

impl<'a> TranscriptView<'a> {
    /// Create a transcript view.
    pub fn new(messages: &'a [Message], theme: &'a Theme) -> Self {
        Self {
            messages,
            theme,
            user_name: "You",
            assistant_name: "Assistant",
            pending: false,
            spinner_frame: 0,
            scroll_offset: 0,
        }
    }

    /// Set the sender labels.
    #[must_use]
    pub fn labels(mut self, user_name: &'a str, assistant_name: &'a str) -> Self {
        self.user_name = user_name;
        self.assistant_name = assistant_name;
        self
    }

    /// Show the in-flight bubble.
    #[must_use]
    pub fn pending(mut self, pending: bool, spinner_frame: usize) -> Self {
        self.pending = pending;
        self.spinner_frame = spinner_frame;
        self
    }

    /// Scroll up from the newest line by `offset` lines.
    #[must_use]
    pub fn scroll_offset(mut self, offset: u16) -> Self {
        self.scroll_offset = offset;
        self
    }

    /// Build every transcript line for the given content width.
    pub fn build_lines(&self, width: usize) -> Vec<Line<'static>> {
        let body_width = width.saturating_sub(BODY_INDENT.len()).max(1);
        let mut lines = Vec::new();

        for (i, message) in self.messages.iter().enumerate() {
            if i > 0 {
                lines.push(Line::default());
            }
            let (label, style) = match message.sender {
                Sender::User => (self.user_name, self.theme.user_label()),
                Sender::Bot => (self.assistant_name, self.theme.bot_label()),
            };
            lines.push(Line::from(Span::styled(label.to_string(), style)));
            for row in wrap_text(&message.text, body_width) {
                lines.push(Line::from(vec![
                    Span::raw(BODY_INDENT),
                    Span::styled(row, self.theme.body()),
                ]));
            }
        }

        if self.pending {
            if !lines.is_empty() {
                lines.push(Line::default());
            }
            lines.push(Line::from(Span::styled(
                self.assistant_name.to_string(),
                self.theme.bot_label(),
            )));
            let spinner = SPINNER[self.spinner_frame % SPINNER.len()];
            lines.push(Line::from(vec![
                Span::raw(BODY_INDENT),
                Span::styled(format!("{spinner} Thinking..."), self.theme.dim()),
            ]));
        }

        lines
    }
}

#[allow(clippy::cast_possible_truncation)]
impl Widget for TranscriptView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(" Conversation ")
            .title_style(Style::default().fg(self.theme.text))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.border))
            .style(Style::default().bg(self.theme.base));

        let inner = block.inner(area);
        block.render(area, buf);
        if inner.width == 0 || inner.height == 0 {
            return;
        }

        let lines = self.build_lines(inner.width as usize);

        // Follow the newest line unless scrolled back
        let max_top = lines.len().saturating_sub(inner.height as usize);
        let top = max_top.saturating_sub(self.scroll_offset as usize);

        Paragraph::new(lines)
            .scroll((top.min(u16::MAX as usize) as u16, 0))
            .render(inner, buf);
    }
}
