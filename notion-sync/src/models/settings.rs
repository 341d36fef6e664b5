//! Sync settings backed by a RON file.
//!
//! Loaded from `notion_sync.ron` (see `config::settings_path`), then overlaid
//! with `NOTION_*` environment variables. Settings are never written back.

use crate::config::{self, defaults, env_vars};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Settings {
    /// Notion integration token.
    #[serde(default)]
    pub notion_api_key: String,
    /// Target database that new pages are created under.
    #[serde(default)]
    pub database_id: String,
    /// Optional page cover image.
    #[serde(default)]
    pub cover_image_url: Option<String>,
    /// Workspace alias for public links (`<alias>.notion.site`).
    #[serde(default)]
    pub site_alias: Option<String>,
    /// Export frontmatter `tags` to the database `Tags` column.
    #[serde(default)]
    pub convert_tags: bool,
    /// Notice language tag, e.g. "en" or "zh".
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
}

fn default_api_base_url() -> String {
    defaults::API_BASE_URL.to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            notion_api_key: String::new(),
            database_id: String::new(),
            cover_image_url: None,
            site_alias: None,
            convert_tags: false,
            language: None,
            api_base_url: default_api_base_url(),
        }
    }
}

impl Settings {
    /// Load from a RON file, falling back to `Default` on any error.
    pub fn load_from(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => match ron::from_str::<Settings>(&content) {
                Ok(settings) => settings,
                Err(e) => {
                    log::warn!("Failed to parse {}: {}; using defaults", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                log::debug!("Could not read {} ({}), using defaults", path.display(), e);
                Self::default()
            }
        }
    }

    /// Overlay values from a variable lookup (the process environment in
    /// production, a map in tests). Blank values are ignored.
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(v) = get(env_vars::API_KEY) {
            self.notion_api_key = v;
        }
        if let Some(v) = get(env_vars::DATABASE_ID) {
            self.database_id = v;
        }
        if let Some(v) = get(env_vars::COVER_URL) {
            self.cover_image_url = Some(v);
        }
        if let Some(v) = get(env_vars::SITE_ALIAS) {
            self.site_alias = Some(v);
        }
        if let Some(v) = get(env_vars::CONVERT_TAGS) {
            match config::parse_flag(&v) {
                Some(flag) => self.convert_tags = flag,
                None => log::warn!("Ignoring invalid {} value: {}", env_vars::CONVERT_TAGS, v),
            }
        }
        if let Some(v) = get(env_vars::LANGUAGE) {
            self.language = Some(v);
        }
        if let Some(v) = get(env_vars::API_BASE_URL) {
            self.api_base_url = v;
        }
        self
    }

    /// True when both the API key and the target database are set.
    pub fn is_configured(&self) -> bool {
        !self.notion_api_key.trim().is_empty() && !self.database_id.trim().is_empty()
    }

    pub fn site_alias(&self) -> Option<&str> {
        non_blank(self.site_alias.as_deref())
    }

    pub fn cover_image_url(&self) -> Option<&str> {
        non_blank(self.cover_image_url.as_deref())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
