//! One-way sync of markdown notes into a Notion database.
//!
//! A note's body is pushed as a fresh Notion page and the page id and link
//! are written back into the note's YAML frontmatter, so the next sync can
//! find and replace the remote copy.

pub mod config;
pub mod error;
pub mod integrations;
pub mod models;
pub mod notes;
pub mod notion;
pub mod sync;

pub use error::SyncError;
pub use sync::{SyncReport, SyncResult, Syncer};
