//! Host integrations: clipboard and user notices.

pub mod clipboard;
pub mod notices;

pub use clipboard::{Clipboard, SystemClipboard};
pub use notices::{ConsoleNotifier, Language, Notice, Notifier, RecordingNotifier};
