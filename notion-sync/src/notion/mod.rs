//! Notion side of the sync: request building, the HTTP client and
//! markdown → block conversion.

pub mod blocks;
pub mod client;
pub mod page;

pub use blocks::{BlockConverter, MarkdownConverter};
pub use client::{NotionClient, PageStore, RemoteError};
pub use page::{RemotePage, SyncRequest};
