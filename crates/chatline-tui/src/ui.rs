//! Chat screen layout.
//!
//! Regions, top to bottom:
//! 1. Header (title and backend URL, 1 line)
//! 2. Transcript (expands)
//! 3. Error banner (1 line, only after a failed exchange)
//! 4. Composer (3 lines)
//! 5. Footer hints (1 line)

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph},
    Frame,
};

use crate::app::App;
use crate::widgets::{Composer, ErrorBanner, Footer, TranscriptView};

/// Minimum terminal width.
pub const MIN_WIDTH: u16 = 30;
/// Minimum terminal height.
pub const MIN_HEIGHT: u16 = 8;

/// Render the chat screen.
pub fn render(frame: &mut Frame<'_>, app: &App) {
    let area = frame.area();
    let theme = &app.theme;
    frame.render_widget(Block::default().style(Style::default().bg(theme.base)), area);

    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        let warning = Paragraph::new(Span::styled("Terminal too small", theme.error()));
        frame.render_widget(warning, area);
        return;
    }

    let error = app.conversation.last_error();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(u16::from(error.is_some())),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .split(area);

    render_header(frame, app, chunks[0]);

    let pending = app.conversation.is_pending();
    let transcript = TranscriptView::new(app.conversation.messages(), theme)
        .labels(&app.config.user_name, &app.config.assistant_name)
        .pending(pending, app.spinner_frame)
        .scroll_offset(app.scroll_offset);
    frame.render_widget(transcript, chunks[1]);

    if let Some(detail) = error {
        frame.render_widget(ErrorBanner::new(detail, theme), chunks[2]);
    }

    let composer = Composer::new(&app.input, theme)
        .placeholder(&app.config.placeholder)
        .pending(pending);
    if let Some((x, y)) = composer.cursor_position(chunks[3]) {
        frame.set_cursor_position((x, y));
    }
    frame.render_widget(composer, chunks[3]);

    let footer = Footer::new(theme).notification(app.notification.as_deref());
    frame.render_widget(footer, chunks[4]);
}

fn render_header(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let theme = &app.theme;
    let line = Line::from(vec![
        Span::styled(
            format!(" {} ", app.config.title),
            Style::default()
                .fg(theme.primary)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(app.config.backend_url.clone(), Style::default().fg(theme.subtext)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}
