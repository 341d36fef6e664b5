//! Sync orchestration: create-vs-replace decision, remote calls and
//! frontmatter write-back.

pub mod orchestrator;
pub mod upload;
pub mod write_back;

pub use upload::UploadSummary;

#[cfg(test)]
pub(crate) mod testing;

use std::sync::Arc;

use crate::error::SyncError;
use crate::integrations::{Clipboard, ConsoleNotifier, Language, Notifier, SystemClipboard};
use crate::models::Settings;
use crate::notes::Vault;
use crate::notion::{BlockConverter, MarkdownConverter, PageStore, RemotePage};

/// How the remote page was produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncAction {
    Created,
    /// The page behind `previous_id` was deleted and a new one created.
    Replaced { previous_id: String },
}

#[derive(Debug, Clone)]
pub struct SyncReport {
    pub action: SyncAction,
    pub page: RemotePage,
    /// Link written to the note, alias-rewritten when configured.
    pub link: String,
    /// False when the note could not be rewritten; the next sync will then
    /// create a duplicate page.
    pub persisted: bool,
}

pub type SyncResult = Result<SyncReport, SyncError>;

/// Runs syncs for one set of settings and collaborators.
pub struct Syncer {
    settings: Settings,
    store: Arc<dyn PageStore>,
    vault: Arc<dyn Vault>,
    converter: Arc<dyn BlockConverter>,
    clipboard: Arc<dyn Clipboard>,
    notifier: Arc<dyn Notifier>,
}

impl Syncer {
    /// Create a syncer with the default converter, the system clipboard and
    /// console notices in English.
    pub fn new(settings: Settings, store: Arc<dyn PageStore>, vault: Arc<dyn Vault>) -> Self {
        Self {
            settings,
            store,
            vault,
            converter: Arc::new(MarkdownConverter),
            clipboard: Arc::new(SystemClipboard::detect()),
            notifier: Arc::new(ConsoleNotifier::new(Language::En)),
        }
    }

    /// Set the block converter (builder pattern)
    pub fn with_converter(mut self, converter: Arc<dyn BlockConverter>) -> Self {
        self.converter = converter;
        self
    }

    /// Set the clipboard (builder pattern)
    pub fn with_clipboard(mut self, clipboard: Arc<dyn Clipboard>) -> Self {
        self.clipboard = clipboard;
        self
    }

    /// Set the notifier (builder pattern)
    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }
}
