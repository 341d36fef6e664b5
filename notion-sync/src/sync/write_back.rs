//! Write the remote page id and link back into the note's frontmatter.

use crate::error::SyncError;
use crate::integrations::{Clipboard, Notice, Notifier};
use crate::notes::frontmatter::{self, LINK_KEY, NOTION_ID_KEY};
use crate::notes::{DocumentHandle, Vault};
use crate::notion::RemotePage;

/// Host fragment of Notion's default page links.
const DEFAULT_HOST: &str = "www.notion.so";

/// Link shown to the user: the workspace alias host when one is set,
/// otherwise the URL Notion returned.
pub fn display_url(url: &str, site_alias: Option<&str>) -> String {
    match site_alias.map(str::trim).filter(|a| !a.is_empty()) {
        Some(alias) => url.replace(DEFAULT_HOST, &format!("{}.notion.site", alias)),
        None => url.to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteBack {
    pub link: String,
    pub persisted: bool,
}

pub struct MetadataWriter<'a> {
    pub vault: &'a dyn Vault,
    pub clipboard: &'a dyn Clipboard,
    pub notifier: &'a dyn Notifier,
    pub site_alias: Option<&'a str>,
}

impl MetadataWriter<'_> {
    /// Merge `link` and `notionID` into the note and persist it. Clipboard
    /// and persistence failures become notices; neither is retried.
    pub async fn apply(
        &self,
        document_text: &str,
        document: &DocumentHandle,
        page: &RemotePage,
    ) -> WriteBack {
        let mut fm = frontmatter::parse(document_text);
        let link = display_url(&page.url, self.site_alias);

        fm.set(LINK_KEY, link.as_str());
        fm.set(NOTION_ID_KEY, page.id.as_str());

        if let Err(e) = self.clipboard.write_text(&link).await {
            log::warn!("[CLIPBOARD] Could not copy {}: {}", link, e);
            self.notifier.notify(Notice::CopyLinkFailed(e));
        }

        let persisted = match fm.to_text() {
            Ok(text) => self
                .vault
                .write_document(document, &text)
                .await
                .map_err(|e| SyncError::Persistence(e.to_string())),
            Err(e) => Err(e),
        };

        match persisted {
            Ok(()) => {
                log::info!("[SYNC] Saved notionID {} to {}", page.id, document);
                WriteBack {
                    link,
                    persisted: true,
                }
            }
            Err(e) => {
                log::error!(
                    "[SYNC] Page {} exists but {} was not updated: {}",
                    page.id,
                    document,
                    e
                );
                self.notifier.notify(Notice::WriteFileFailed(e.to_string()));
                WriteBack {
                    link,
                    persisted: false,
                }
            }
        }
    }
}
