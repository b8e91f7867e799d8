//! chatline-tui: Terminal UI for the chatline chat client
//!
//! This crate provides the interactive chat screen:
//! - Transcript with sender labels and a pending indicator
//! - Composer with input history
//! - Error banner, key hints and markdown export

mod app;
mod event;
pub mod export;
mod text;
pub mod theme;
#[cfg(test)]
pub mod test_utils;
mod ui;
pub mod widgets;

pub use app::App;
pub use event::{Action, Event, EventHandler};
pub use chatline_engine;

use chatline_engine::{ChatBackend, ChatError, ChatReply, Config, HttpBackend};
use crossterm::{
    cursor::Show as ShowCursor,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, stdout};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{error, info};

/// RAII guard for terminal state restoration.
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(stdout(), LeaveAlternateScreen, ShowCursor);
    }
}

/// Run the chat TUI against the configured HTTP backend.
///
/// Sets up the terminal, runs the event loop, and restores the terminal on
/// exit. Transcripts exported with Ctrl+E land in `export_dir`.
pub async fn run_tui(config: Config, export_dir: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let backend: Arc<dyn ChatBackend> = Arc::new(HttpBackend::new(&config.backend_url));
    info!(backend = %config.chat_url(), "Starting chat TUI");

    enable_raw_mode()?;
    let _guard = TerminalGuard;

    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    let mut app = App::new(config, export_dir);

    // 10 Hz keeps the spinner moving
    let mut events = EventHandler::new(100);

    let result = run_loop(&mut terminal, &mut app, &mut events, backend).await;

    terminal.show_cursor()?;

    result
}

async fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &mut EventHandler,
    backend: Arc<dyn ChatBackend>,
) -> Result<(), Box<dyn std::error::Error>> {
    // At most one request is in flight
    let mut chat_handle: Option<JoinHandle<Result<ChatReply, ChatError>>> = None;

    loop {
        terminal.draw(|frame| ui::render(frame, app))?;

        if let Some(event) = events.next().await {
            match event {
                Event::Key(key) => {
                    if let Some(request) = app.handle_key(key) {
                        let backend = Arc::clone(&backend);
                        chat_handle = Some(tokio::spawn(async move {
                            backend.send(&request.text).await
                        }));
                    }
                }
                Event::Tick => app.tick(),
                Event::Resize(_, _) => {}
            }
        }

        if chat_handle.as_ref().is_some_and(JoinHandle::is_finished) {
            if let Some(handle) = chat_handle.take() {
                let outcome = handle.await.unwrap_or_else(|e| {
                    error!(error = %e, "Chat task failed");
                    Err(ChatError::Transport(String::new()))
                });
                app.resolve(outcome);
            }
        }

        if app.should_quit {
            if let Some(handle) = chat_handle.take() {
                handle.abort();
            }
            break;
        }
    }

    Ok(())
}

/// Returns the TUI version.
pub fn tui_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
