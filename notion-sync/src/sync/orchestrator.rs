//! Create-or-replace decision and sequencing for one sync attempt.
//!
//! The note's cached `notionID` picks the path: none (or blank) creates a
//! page, anything else deletes that page and creates a new one. Only a
//! successful remote write touches the note.

use super::write_back::MetadataWriter;
use super::{SyncAction, SyncReport, SyncResult, Syncer};
use crate::error::SyncError;
use crate::integrations::Notice;
use crate::notes::{DocumentHandle, frontmatter};
use crate::notion::SyncRequest;

impl Syncer {
    /// Push one note to Notion and record the resulting page in its
    /// frontmatter.
    pub async fn sync(
        &self,
        title: &str,
        allow_tags: bool,
        tags: &[String],
        document_text: &str,
        document: &DocumentHandle,
        container_id: &str,
    ) -> SyncResult {
        let parsed = frontmatter::parse(document_text);
        let blocks = self.converter.to_blocks(&parsed.body);

        // The host cache decides; the text is only checked for drift
        let cached = self.vault.cached_front_matter(document).await;
        let existing_id = cached.as_ref().and_then(frontmatter::notion_id);
        if existing_id != parsed.notion_id() {
            log::warn!(
                "[SYNC] Cached notionID {:?} differs from {:?} in {}; using the cached value",
                existing_id,
                parsed.notion_id(),
                document
            );
        }

        let request = SyncRequest {
            container_id: container_id.to_string(),
            title: title.to_string(),
            tags: tags.to_vec(),
            allow_tags,
            blocks,
            cover_url: self.settings.cover_image_url().map(str::to_string),
        };

        let (action, outcome) = match existing_id {
            Some(old_id) => {
                log::info!("[SYNC] Replacing page {} for {}", old_id, document);
                let outcome = self.store.replace_page(&request, old_id).await;
                if outcome.is_err() {
                    log::error!(
                        "[SYNC] Replace of page {} failed; if the delete went through, the old page is gone and was not recreated",
                        old_id
                    );
                }
                let action = SyncAction::Replaced {
                    previous_id: old_id.to_string(),
                };
                (action, outcome)
            }
            None => {
                log::info!("[SYNC] Creating page for {}", document);
                (SyncAction::Created, self.store.create_page(&request).await)
            }
        };

        let page = match outcome {
            Ok(page) => page,
            Err(e) => {
                let err = SyncError::from(e);
                log::error!("[SYNC] {} failed: {}", document, err);
                self.notifier.notify(notice_for(&err));
                return Err(err);
            }
        };

        let writer = MetadataWriter {
            vault: self.vault.as_ref(),
            clipboard: self.clipboard.as_ref(),
            notifier: self.notifier.as_ref(),
            site_alias: self.settings.site_alias(),
        };
        let written = writer.apply(document_text, document, &page).await;

        Ok(SyncReport {
            action,
            page,
            link: written.link,
            persisted: written.persisted,
        })
    }
}

fn notice_for(err: &SyncError) -> Notice {
    match err {
        SyncError::RemoteRejection { message, .. } => Notice::RemoteRejected(message.clone()),
        SyncError::Transport(msg) => Notice::NetworkError(msg.clone()),
        other => Notice::NetworkError(other.to_string()),
    }
}
