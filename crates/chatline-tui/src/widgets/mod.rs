//! Reusable widgets for the chat screen.

pub mod composer;
pub mod error_banner;
pub mod footer;
pub mod text_input;
pub mod transcript;

pub use composer::Composer;
pub use error_banner::ErrorBanner;
pub use footer::Footer;
pub use text_input::TextInputState;
pub use transcript::TranscriptView;
