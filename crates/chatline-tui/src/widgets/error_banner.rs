//! Error banner shown above the composer when the last request failed.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Paragraph, Widget, Wrap},
};

use crate::theme::Theme;

pub struct ErrorBanner<'a> {
    detail: &'a str,
    theme: &'a Theme,
}

impl<'a> ErrorBanner<'a> {
    pub fn new(detail: &'a str, theme: &'a Theme) -> Self {
        Self { detail, theme }
    }
}

impl Widget for ErrorBanner<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let line = Line::from(vec![
            Span::styled(" Error: ", self.theme.error()),
            Span::styled(self.detail.to_string(), self.theme.body()),
        ]);
        Paragraph::new(line)
            .wrap(Wrap { trim: true })
            .render(area, buf);
    }
}
