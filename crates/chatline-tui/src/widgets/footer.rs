//! Footer with key hints or a transient notification.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::theme::Theme;

const HINTS: &[(&str, &str)] = &[
    ("Enter", "send"),
    ("↑↓", "history"),
    ("PgUp/PgDn", "scroll"),
    ("Ctrl+E", "export"),
    ("Esc", "quit"),
];

pub struct Footer<'a> {
    theme: &'a Theme,
    notification: Option<&'a str>,
}

impl<'a> Footer<'a> {
    pub fn new(theme: &'a Theme) -> Self {
        Self {
            theme,
            notification: None,
        }
    }

    #[must_use]
    pub fn notification(mut self, notification: Option<&'a str>) -> Self {
        self.notification = notification;
        self
    }
}

impl Widget for Footer<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let line = if let Some(note) = self.notification {
            Line::from(Span::styled(
                format!(" {note}"),
                Style::default().fg(self.theme.success),
            ))
        } else {
            let mut spans = vec![Span::raw(" ")];
            for (i, (key, action)) in HINTS.iter().enumerate() {
                if i > 0 {
                    spans.push(Span::styled("  ", self.theme.dim()));
                }
                spans.push(Span::styled(*key, Style::default().fg(self.theme.subtext)));
                spans.push(Span::styled(format!(" {action}"), self.theme.dim()));
            }
            Line::from(spans)
        };
        Paragraph::new(line).render(area, buf);
    }
}
