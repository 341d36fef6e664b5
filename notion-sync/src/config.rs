use std::env;
use std::path::PathBuf;

/// Environment variable names - single source of truth
pub mod env_vars {
    /// Explicit path to the settings file.
    pub const CONFIG_PATH: &str = "NOTION_SYNC_CONFIG";
    pub const API_KEY: &str = "NOTION_API_KEY";
    pub const DATABASE_ID: &str = "NOTION_DATABASE_ID";
    pub const COVER_URL: &str = "NOTION_COVER_URL";
    /// Custom workspace alias, e.g. "myteam" for https://myteam.notion.site/
    pub const SITE_ALIAS: &str = "NOTION_SITE_ALIAS";
    /// "true"/"1" to export frontmatter tags to the `Tags` column.
    pub const CONVERT_TAGS: &str = "NOTION_CONVERT_TAGS";
    pub const LANGUAGE: &str = "NOTION_SYNC_LANG";
    pub const API_BASE_URL: &str = "NOTION_API_BASE_URL";
    /// Host locale, consulted only when no language is configured.
    pub const HOST_LANG: &str = "LANG";
}

/// Default values
pub mod defaults {
    pub const API_BASE_URL: &str = "https://api.notion.com";
    pub const APP_DIR: &str = "notion-sync";
    pub const CONFIG_FILE: &str = "notion_sync.ron";
    pub const REQUEST_TIMEOUT_SECS: u64 = 60;
}

/// Get the settings file path.
///
/// NOTION_SYNC_CONFIG wins; otherwise `<config dir>/notion-sync/notion_sync.ron`,
/// falling back to the working directory when the platform has no config dir.
pub fn settings_path() -> PathBuf {
    if let Some(path) = env_string(env_vars::CONFIG_PATH) {
        return PathBuf::from(path);
    }

    dirs::config_dir()
        .map(|dir| dir.join(defaults::APP_DIR).join(defaults::CONFIG_FILE))
        .unwrap_or_else(|| PathBuf::from(defaults::CONFIG_FILE))
}

/// Read an environment variable, treating blank values as unset.
pub fn env_string(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parse a boolean flag value ("1", "true", "yes", "on" and their negatives).
pub fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
