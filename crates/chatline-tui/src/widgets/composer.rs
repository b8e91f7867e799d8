//! Composer widget: the single-line message input.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};
use unicode_width::UnicodeWidthStr;

use super::text_input::TextInputState;
use crate::text::tail_fitting;
use crate::theme::Theme;

const PROMPT: &str = "> ";

/// Message composer.
///
/// Shows the placeholder while empty and "Sending..." while a request is
/// in flight. Long drafts are clipped from the left so the cursor stays
/// visible.
pub struct Composer<'a> {
    input: &'a TextInputState,
    theme: &'a Theme,
    placeholder: &'a str,
    pending: bool,
}

impl<'a> Composer<'a> {
    pub fn new(input: &'a TextInputState, theme: &'a Theme) -> Self {
        Self {
            input,
            theme,
            placeholder: "",
            pending: false,
        }
    }

    #[must_use]
    pub fn placeholder(mut self, placeholder: &'a str) -> Self {
        self.placeholder = placeholder;
        self
    }

    #[must_use]
    pub fn pending(mut self, pending: bool) -> Self {
        self.pending = pending;
        self
    }

    /// Terminal cursor position for this composer rendered in `area`.
    ///
    /// `None` while sending, since the input is not editable.
    #[allow(clippy::cast_possible_truncation)]
    pub fn cursor_position(&self, area: Rect) -> Option<(u16, u16)> {
        if self.pending || area.width < 3 || area.height < 3 {
            return None;
        }
        let inner_width = area.width.saturating_sub(2) as usize;
        let available = inner_width.saturating_sub(PROMPT.len() + 1);
        let before: String = self.input.content().chars().take(self.input.cursor()).collect();
        let visible = tail_fitting(&before, available).width();
        let x = area.x + 1 + (PROMPT.len() + visible).min(inner_width.saturating_sub(1)) as u16;
        Some((x, area.y + 1))
    }
}

impl Widget for Composer<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border = if self.pending {
            self.theme.border
        } else {
            self.theme.border_focused
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border))
            .style(Style::default().bg(self.theme.surface));

        let inner = block.inner(area);
        block.render(area, buf);
        if inner.width == 0 || inner.height == 0 {
            return;
        }

        let prompt = Span::styled(PROMPT, self.theme.bot_label());
        let line = if self.pending {
            Line::from(vec![prompt, Span::styled("Sending...", self.theme.dim())])
        } else if self.input.is_empty() {
            Line::from(vec![prompt, Span::styled(self.placeholder, self.theme.dim())])
        } else {
            // Keep the text up to the cursor in view
            let available = (inner.width as usize).saturating_sub(PROMPT.len() + 1);
            let before: String = self.input.content().chars().take(self.input.cursor()).collect();
            let shown_before = tail_fitting(&before, available);
            let skip = before.chars().count() - shown_before.chars().count();
            let shown: String = self.input.content().chars().skip(skip).collect();
            Line::from(vec![prompt, Span::styled(shown, self.theme.body())])
        };

        Paragraph::new(line).render(inner, buf);
    }
}
