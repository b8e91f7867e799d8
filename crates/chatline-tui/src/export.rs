//! Markdown export of the transcript.

use chatline_engine::{Config, Conversation, Sender};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

/// File name written by [`write_transcript`].
pub const EXPORT_FILE_NAME: &str = "chatline-transcript.md";

/// Render the conversation as a markdown document.
pub fn transcript_markdown(conversation: &Conversation, config: &Config) -> String {
    let mut content = String::new();
    let _ = write!(
        content,
        "# {} Transcript\n\nBackend: {}\n\n---\n\n",
        config.title, config.backend_url
    );

    for message in conversation.messages() {
        let label = match message.sender {
            Sender::User => &config.user_name,
            Sender::Bot => &config.assistant_name,
        };
        let _ = write!(content, "### {label}\n\n{}\n\n", message.text);
    }

    if let Some(error) = conversation.last_error() {
        let _ = writeln!(content, "---\n\nLast error: {error}");
    }

    content
}

/// Write `markdown` to `<dir>/chatline-transcript.md`, creating `dir` if needed.
pub fn write_transcript(dir: &Path, markdown: &str) -> std::io::Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(EXPORT_FILE_NAME);
    std::fs::write(&path, markdown)?;
    Ok(path)
}
