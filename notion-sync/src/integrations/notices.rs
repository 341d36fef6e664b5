//! User-visible notices.
//!
//! Notices are fire-and-forget: showing one never fails and never changes a
//! sync result. Text is localized with a `Language` chosen once at startup.

use std::sync::Mutex;

/// Notice language. Resolved once and injected; nothing reads the locale
/// after startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    #[default]
    En,
    Zh,
}

impl Language {
    /// Parse a language tag or locale ("zh", "zh-CN", "zh_CN.UTF-8", "en_US").
    pub fn from_tag(tag: &str) -> Option<Language> {
        let lower = tag.trim().to_lowercase();
        let primary = lower.split(['-', '_', '.']).next().unwrap_or_default();
        match primary {
            "zh" => Some(Language::Zh),
            "en" | "c" | "posix" => Some(Language::En),
            _ => None,
        }
    }

    /// Settings value first, then the host locale, then English.
    pub fn resolve(configured: Option<&str>, host_locale: Option<&str>) -> Language {
        configured
            .and_then(Language::from_tag)
            .or_else(|| host_locale.and_then(Language::from_tag))
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    SyncSucceeded { title: String },
    SyncFailed { title: String },
    /// API key or database id missing.
    NotConfigured,
    ReadFailed { path: String, reason: String },
    SetTagsFailed,
    NetworkError(String),
    /// Non-success response, carrying Notion's message.
    RemoteRejected(String),
    CopyLinkFailed(String),
    WriteFileFailed(String),
}

impl Notice {
    pub fn is_error(&self) -> bool {
        !matches!(self, Notice::SyncSucceeded { .. })
    }

    pub fn render(&self, lang: Language) -> String {
        match (self, lang) {
            (Notice::SyncSucceeded { title }, Language::En) => format!("Sync to Notion succeeded: {}", title),
            (Notice::SyncSucceeded { title }, Language::Zh) => format!("同步到 Notion 成功：{}", title),
            (Notice::SyncFailed { title }, Language::En) => format!("Sync to Notion failed: {}", title),
            (Notice::SyncFailed { title }, Language::Zh) => format!("同步到 Notion 失败：{}", title),
            (Notice::NotConfigured, Language::En) => {
                "Please set up the Notion API token and database ID in the settings.".to_string()
            }
            (Notice::NotConfigured, Language::Zh) => "请先在设置中填写 Notion API Token 和数据库 ID。".to_string(),
            (Notice::ReadFailed { path, reason }, Language::En) => format!("Could not read {}: {}", path, reason),
            (Notice::ReadFailed { path, reason }, Language::Zh) => format!("无法读取 {}：{}", path, reason),
            (Notice::SetTagsFailed, Language::En) => {
                "Could not read tags from frontmatter; syncing without tags.".to_string()
            }
            (Notice::SetTagsFailed, Language::Zh) => "读取 frontmatter 中的 tags 失败，将不带标签同步。".to_string(),
            (Notice::NetworkError(e), Language::En) => format!("Network error: {}", e),
            (Notice::NetworkError(e), Language::Zh) => format!("网络错误：{}", e),
            (Notice::RemoteRejected(msg), _) => msg.clone(),
            (Notice::CopyLinkFailed(e), Language::En) => format!("Failed to copy the link, please copy it manually: {}", e),
            (Notice::CopyLinkFailed(e), Language::Zh) => format!("复制链接失败，请手动复制：{}", e),
            (Notice::WriteFileFailed(e), Language::En) => format!("Write file error: {}", e),
            (Notice::WriteFileFailed(e), Language::Zh) => format!("写入文件失败：{}", e),
        }
    }
}

pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// Prints notices to the terminal.
pub struct ConsoleNotifier {
    language: Language,
}

impl ConsoleNotifier {
    pub fn new(language: Language) -> Self {
        Self { language }
    }
}

impl Notifier for ConsoleNotifier {
    fn notify(&self, notice: Notice) {
        let text = notice.render(self.language);
        if notice.is_error() {
            log::warn!("[NOTICE] {:?}", notice);
            eprintln!("{}", text);
        } else {
            log::info!("[NOTICE] {:?}", notice);
            println!("{}", text);
        }
    }
}

/// Keeps notices in memory. Useful for embedding and tests.
#[derive(Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        self.notices
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(notice);
    }
}
