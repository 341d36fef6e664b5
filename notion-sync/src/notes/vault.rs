//! Document access for the sync core.
//!
//! The sync only needs to read a note, write it back, and look up the
//! frontmatter the host has cached for it. `FsVault` does this for plain
//! files and caches the frontmatter it saw on the last read or write.

use async_trait::async_trait;
use serde_yaml::Mapping;
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::{file_ops, frontmatter};

/// Identity of a synced note.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocumentHandle {
    path: PathBuf,
}

impl DocumentHandle {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Page title derived from the file name.
    pub fn title(&self) -> String {
        file_ops::title_for(&self.path)
    }
}

impl std::fmt::Display for DocumentHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

#[async_trait]
pub trait Vault: Send + Sync {
    async fn read_document(&self, doc: &DocumentHandle) -> io::Result<String>;

    async fn write_document(&self, doc: &DocumentHandle, content: &str) -> io::Result<()>;

    /// Frontmatter as the host last saw it; `None` when the note has none.
    async fn cached_front_matter(&self, doc: &DocumentHandle) -> Option<Mapping>;
}

/// Filesystem-backed vault.
#[derive(Default)]
pub struct FsVault {
    cache: Mutex<HashMap<PathBuf, Mapping>>,
}

impl FsVault {
    pub fn new() -> Self {
        Self::default()
    }

    fn remember(&self, path: &Path, content: &str) {
        let mapping = frontmatter::parse(content).mapping;
        self.cache
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(path.to_path_buf(), mapping);
    }
}

#[async_trait]
impl Vault for FsVault {
    async fn read_document(&self, doc: &DocumentHandle) -> io::Result<String> {
        let content = file_ops::read_note(doc.path()).await?;
        self.remember(doc.path(), &content);
        Ok(content)
    }

    async fn write_document(&self, doc: &DocumentHandle, content: &str) -> io::Result<()> {
        file_ops::write_note(doc.path(), content).await?;
        self.remember(doc.path(), content);
        log::debug!("[VAULT] Wrote {} bytes to {}", content.len(), doc);
        Ok(())
    }

    async fn cached_front_matter(&self, doc: &DocumentHandle) -> Option<Mapping> {
        let cached = self
            .cache
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(doc.path())
            .cloned();

        let mapping = match cached {
            Some(mapping) => mapping,
            None => {
                let content = file_ops::read_note(doc.path()).await.ok()?;
                self.remember(doc.path(), &content);
                frontmatter::parse(&content).mapping
            }
        };

        if mapping.is_empty() { None } else { Some(mapping) }
    }
}
