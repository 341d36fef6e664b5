//! In-memory collaborators for sync tests.

use async_trait::async_trait;
use serde_yaml::Mapping;
use std::collections::HashMap;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

use crate::integrations::Clipboard;
use crate::notes::{DocumentHandle, Vault, frontmatter};
use crate::notion::{PageStore, RemoteError, RemotePage, SyncRequest};

#[derive(Debug, Clone)]
pub enum Call {
    Create(SyncRequest),
    Delete(String),
}

/// Records every remote call and answers with canned results.
pub struct MockStore {
    calls: Mutex<Vec<Call>>,
    create_result: Result<RemotePage, RemoteError>,
    delete_result: Result<(), RemoteError>,
}

impl MockStore {
    pub fn returning(id: &str, url: &str) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            create_result: Ok(RemotePage {
                id: id.to_string(),
                url: url.to_string(),
            }),
            delete_result: Ok(()),
        }
    }

    pub fn failing_create(mut self, err: RemoteError) -> Self {
        self.create_result = Err(err);
        self
    }

    pub fn failing_delete(mut self, err: RemoteError) -> Self {
        self.delete_result = Err(err);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn creates(&self) -> Vec<SyncRequest> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Create(req) => Some(req),
                Call::Delete(_) => None,
            })
            .collect()
    }

    pub fn deletes(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Delete(id) => Some(id),
                Call::Create(_) => None,
            })
            .collect()
    }
}

#[async_trait]
impl PageStore for MockStore {
    async fn create_page(&self, request: &SyncRequest) -> Result<RemotePage, RemoteError> {
        self.calls.lock().unwrap().push(Call::Create(request.clone()));
        self.create_result.clone()
    }

    async fn delete_page(&self, page_id: &str) -> Result<(), RemoteError> {
        self.calls.lock().unwrap().push(Call::Delete(page_id.to_string()));
        self.delete_result.clone()
    }
}

/// Documents held in memory. The cached frontmatter is kept separately so
/// tests can make it disagree with the document text.
#[derive(Default)]
pub struct MemoryVault {
    docs: Mutex<HashMap<PathBuf, String>>,
    cached: Mutex<HashMap<PathBuf, Mapping>>,
    fail_writes: bool,
    writes: Mutex<usize>,
}

impl MemoryVault {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a document and cache its frontmatter, as a host would on open.
    pub fn with_document(self, doc: &DocumentHandle, content: &str) -> Self {
        self.docs
            .lock()
            .unwrap()
            .insert(doc.path().to_path_buf(), content.to_string());
        self.with_cached(doc, frontmatter::parse(content).mapping)
    }

    pub fn with_cached(self, doc: &DocumentHandle, mapping: Mapping) -> Self {
        self.cached
            .lock()
            .unwrap()
            .insert(doc.path().to_path_buf(), mapping);
        self
    }

    pub fn failing_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    pub fn content(&self, doc: &DocumentHandle) -> Option<String> {
        self.docs.lock().unwrap().get(doc.path()).cloned()
    }

    pub fn writes(&self) -> usize {
        *self.writes.lock().unwrap()
    }
}

#[async_trait]
impl Vault for MemoryVault {
    async fn read_document(&self, doc: &DocumentHandle) -> io::Result<String> {
        self.content(doc)
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no such document"))
    }

    async fn write_document(&self, doc: &DocumentHandle, content: &str) -> io::Result<()> {
        if self.fail_writes {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only vault"));
        }
        *self.writes.lock().unwrap() += 1;
        self.docs
            .lock()
            .unwrap()
            .insert(doc.path().to_path_buf(), content.to_string());
        self.cached
            .lock()
            .unwrap()
            .insert(doc.path().to_path_buf(), frontmatter::parse(content).mapping);
        Ok(())
    }

    async fn cached_front_matter(&self, doc: &DocumentHandle) -> Option<Mapping> {
        self.cached
            .lock()
            .unwrap()
            .get(doc.path())
            .filter(|m| !m.is_empty())
            .cloned()
    }
}

pub struct MockClipboard {
    copied: Mutex<Vec<String>>,
    fail: bool,
}

impl MockClipboard {
    pub fn new() -> Self {
        Self {
            copied: Mutex::new(Vec::new()),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            copied: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn copied(&self) -> Vec<String> {
        self.copied.lock().unwrap().clone()
    }
}

#[async_trait]
impl Clipboard for MockClipboard {
    async fn write_text(&self, text: &str) -> Result<(), String> {
        if self.fail {
            return Err("clipboard unavailable".to_string());
        }
        self.copied.lock().unwrap().push(text.to_string());
        Ok(())
    }
}
