//! Typed HTTP client for the Notion pages API.
//!
//! Responses are decoded here into `RemotePage` / `RemoteError` so nothing
//! downstream branches on raw status codes or JSON.

use async_trait::async_trait;
use notion_types::{Block, ErrorBody, PageObject};
use reqwest::{Client, Method, RequestBuilder, Response, header};
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

use super::page::{RemotePage, SyncRequest};
use crate::config::defaults;
use crate::models::Settings;

/// API version used for page creation.
pub const CREATE_PAGE_VERSION: &str = "2021-08-16";
/// API version used for block deletion and appends.
pub const BLOCKS_VERSION: &str = "2022-02-22";
/// Notion accepts at most this many children per request.
pub const MAX_CHILDREN_PER_REQUEST: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemoteError {
    /// The request never got a response.
    #[error("network error: {0}")]
    Transport(String),
    /// Non-success status, with Notion's error body when it had one.
    #[error("HTTP {status} {code}: {message}")]
    Rejected {
        status: u16,
        code: String,
        message: String,
    },
    /// Success status but the body was not a usable page object.
    #[error("unexpected response: {0}")]
    Decode(String),
}

impl RemoteError {
    /// The page no longer exists or is already archived, so there is
    /// nothing left to delete.
    pub fn is_gone(&self) -> bool {
        match self {
            RemoteError::Rejected { status: 404, .. } => true,
            RemoteError::Rejected {
                status: 400,
                message,
                ..
            } => message.to_lowercase().contains("archived"),
            _ => false,
        }
    }
}

/// The remote operations the sync protocol needs.
#[async_trait]
pub trait PageStore: Send + Sync {
    /// Create exactly one new page.
    async fn create_page(&self, request: &SyncRequest) -> Result<RemotePage, RemoteError>;

    /// Archive a page by id. Terminal from the local point of view.
    async fn delete_page(&self, page_id: &str) -> Result<(), RemoteError>;

    /// Delete `old_page_id`, then create a fresh page.
    ///
    /// Not atomic and never rolled back: if the delete succeeds and the
    /// create fails, the old page stays deleted and nothing replaces it.
    /// A page that is already gone or archived counts as deleted.
    async fn replace_page(
        &self,
        request: &SyncRequest,
        old_page_id: &str,
    ) -> Result<RemotePage, RemoteError> {
        match self.delete_page(old_page_id).await {
            Ok(()) => {}
            Err(e) if e.is_gone() => {
                log::warn!("[NOTION] Page {} was already removed, creating a new one", old_page_id);
            }
            Err(e) => return Err(e),
        }
        self.create_page(request).await
    }
}

#[derive(Debug, Serialize)]
struct AppendChildrenBody<'a> {
    children: &'a [Block],
}

pub struct NotionClient {
    base_url: String,
    api_key: String,
    client: Client,
}

impl NotionClient {
    pub fn new(base_url: &str, api_key: &str) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(defaults::REQUEST_TIMEOUT_SECS))
            .build()
            .unwrap_or_else(|e| {
                log::warn!("[NOTION] Falling back to default HTTP client: {}", e);
                Client::new()
            });

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.trim().to_string(),
            client,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(&settings.api_base_url, &settings.notion_api_key)
    }

    fn request(&self, method: Method, path: &str, version: &str) -> RequestBuilder {
        self.client
            .request(method, format!("{}{}", self.base_url, path))
            .bearer_auth(&self.api_key)
            .header("Notion-Version", version)
            .header(header::CONTENT_TYPE, "application/json")
    }

    /// Append blocks that did not fit in the create request.
    async fn append_children(&self, page_id: &str, blocks: &[Block]) -> Result<(), RemoteError> {
        let path = format!("/v1/blocks/{}/children", urlencoding::encode(page_id));

        for chunk in blocks.chunks(MAX_CHILDREN_PER_REQUEST) {
            let resp = self
                .request(Method::PATCH, &path, BLOCKS_VERSION)
                .json(&AppendChildrenBody { children: chunk })
                .send()
                .await
                .map_err(|e| RemoteError::Transport(e.to_string()))?;

            if !resp.status().is_success() {
                return Err(decode_error(resp).await);
            }
        }

        Ok(())
    }
}

#[async_trait]
impl PageStore for NotionClient {
    async fn create_page(&self, request: &SyncRequest) -> Result<RemotePage, RemoteError> {
        let body = request.create_body(MAX_CHILDREN_PER_REQUEST);
        log::info!(
            "[NOTION] Creating page '{}' in database {} ({} blocks)",
            request.title,
            request.container_id,
            request.blocks.len()
        );

        let resp = self
            .request(Method::POST, "/v1/pages", CREATE_PAGE_VERSION)
            .json(&body)
            .send()
            .await
            .map_err(|e| RemoteError::Transport(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(decode_error(resp).await);
        }

        let page: PageObject = resp
            .json()
            .await
            .map_err(|e| RemoteError::Decode(e.to_string()))?;

        let page = match (page.id, page.url) {
            (Some(id), Some(url)) if !id.is_empty() && !url.is_empty() => RemotePage { id, url },
            _ => {
                return Err(RemoteError::Decode(
                    "response is missing the page id or url".to_string(),
                ));
            }
        };

        if request.blocks.len() > MAX_CHILDREN_PER_REQUEST {
            let rest = &request.blocks[MAX_CHILDREN_PER_REQUEST..];
            if let Err(e) = self.append_children(&page.id, rest).await {
                // A truncated page must not be reported as created
                log::error!("[NOTION] Failed to append blocks to {}: {}", page.id, e);
                if let Err(cleanup) = self.delete_page(&page.id).await {
                    log::warn!("[NOTION] Could not remove partial page {}: {}", page.id, cleanup);
                }
                return Err(e);
            }
        }

        log::info!("[NOTION] Created page {}", page.id);
        Ok(page)
    }

    async fn delete_page(&self, page_id: &str) -> Result<(), RemoteError> {
        log::info!("[NOTION] Deleting page {}", page_id);

        let resp = self
            .request(
                Method::DELETE,
                &format!("/v1/blocks/{}", urlencoding::encode(page_id)),
                BLOCKS_VERSION,
            )
            .send()
            .await
            .map_err(|e| RemoteError::Transport(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(decode_error(resp).await);
        }

        Ok(())
    }
}

/// Turn a non-success response into `Rejected`, preferring Notion's own
/// error message over the raw body.
async fn decode_error(resp: Response) -> RemoteError {
    let status = resp.status();
    let text = resp.text().await.unwrap_or_default();

    match serde_json::from_str::<ErrorBody>(&text) {
        Ok(body) if !body.message.is_empty() => RemoteError::Rejected {
            status: status.as_u16(),
            code: body.code,
            message: body.message,
        },
        _ => RemoteError::Rejected {
            status: status.as_u16(),
            code: String::new(),
            message: if text.trim().is_empty() {
                status.canonical_reason().unwrap_or("unknown error").to_string()
            } else {
                text
            },
        },
    }
}
