//! The user-facing "sync this note" command.

use super::{SyncResult, Syncer};
use crate::error::SyncError;
use crate::integrations::Notice;
use crate::notes::{DocumentHandle, frontmatter};

/// Outcome of a batch upload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadSummary {
    pub synced: usize,
    pub failed: Vec<DocumentHandle>,
}

impl UploadSummary {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

impl Syncer {
    /// Check settings, read the note and its tags, sync it and announce the
    /// outcome. `container_override` replaces the configured database for
    /// this call only.
    pub async fn upload(
        &self,
        document: &DocumentHandle,
        container_override: Option<&str>,
    ) -> SyncResult {
        if !self.settings.is_configured() {
            self.notifier.notify(Notice::NotConfigured);
            return Err(SyncError::Config(
                "Notion API key and database id are required".to_string(),
            ));
        }

        let text = match self.vault.read_document(document).await {
            Ok(text) => text,
            Err(e) => {
                log::error!("[SYNC] Could not read {}: {}", document, e);
                self.notifier.notify(Notice::ReadFailed {
                    path: document.to_string(),
                    reason: e.to_string(),
                });
                return Err(SyncError::Read(e.to_string()));
            }
        };

        let title = document.title();
        let tags = if self.settings.convert_tags {
            self.tags_for(document).await
        } else {
            Vec::new()
        };

        let container_id = container_override
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .unwrap_or(self.settings.database_id.as_str());

        let result = self
            .sync(
                &title,
                self.settings.convert_tags,
                &tags,
                &text,
                document,
                container_id,
            )
            .await;

        match &result {
            Ok(report) => {
                log::info!("[SYNC] {} -> {}", document, report.link);
                self.notifier.notify(Notice::SyncSucceeded { title });
            }
            Err(_) => self.notifier.notify(Notice::SyncFailed { title }),
        }
        result
    }

    /// Upload notes one after another. A note counts as failed when the
    /// sync errored or its write-back did not persist, since the next run
    /// would then create a duplicate page.
    pub async fn upload_all(
        &self,
        documents: &[DocumentHandle],
        container_override: Option<&str>,
    ) -> UploadSummary {
        let mut summary = UploadSummary::default();
        for document in documents {
            match self.upload(document, container_override).await {
                Ok(report) if report.persisted => summary.synced += 1,
                Ok(_) => {
                    log::warn!("[SYNC] {} was uploaded but its notionID was not saved", document);
                    summary.failed.push(document.clone());
                }
                Err(_) => summary.failed.push(document.clone()),
            }
        }
        summary
    }

    async fn tags_for(&self, document: &DocumentHandle) -> Vec<String> {
        let Some(mapping) = self.vault.cached_front_matter(document).await else {
            return Vec::new();
        };
        match frontmatter::tags(&mapping) {
            Ok(tags) => tags,
            Err(e) => {
                log::warn!("[SYNC] Ignoring tags of {}: {}", document, e);
                self.notifier.notify(Notice::SetTagsFailed);
                Vec::new()
            }
        }
    }
}
