//! File operations for synced notes
//!
//! Reading/writing markdown files, title derivation and directory expansion.

use std::io;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Page title for a note: the file name without its extension
/// (e.g. "notes/Weekly Review.md" -> "Weekly Review").
pub fn title_for(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default()
}

pub fn is_markdown(path: &Path) -> bool {
    path.extension()
        .map(|e| e.eq_ignore_ascii_case("md") || e.eq_ignore_ascii_case("markdown"))
        .unwrap_or(false)
}

/// Read a note file. A missing file is an error here: syncing a note that
/// does not exist must not create an empty page.
pub async fn read_note(path: &Path) -> io::Result<String> {
    tokio::fs::read_to_string(path).await
}

/// Write a note file (creates parent directories as needed)
pub async fn write_note(path: &Path, content: &str) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }
    tokio::fs::write(path, content).await
}

/// Markdown notes under `dir`, recursively and in path order. Dot-prefixed
/// entries such as `.obsidian` or `.trash` are skipped; a missing directory
/// has no notes.
pub fn list_notes(dir: &Path) -> io::Result<Vec<PathBuf>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let walker = WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !is_hidden(entry));

    let mut notes = Vec::new();
    for entry in walker {
        let entry = entry?;
        if entry.file_type().is_file() && is_markdown(entry.path()) {
            notes.push(entry.into_path());
        }
    }
    notes.sort();
    Ok(notes)
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.file_name().to_string_lossy().starts_with('.')
}

/// Expand CLI paths: directories become the markdown files inside them,
/// files are kept as given.
pub fn expand_paths(paths: &[PathBuf]) -> io::Result<Vec<PathBuf>> {
    let mut expanded = Vec::new();
    for path in paths {
        if path.is_dir() {
            expanded.extend(list_notes(path)?);
        } else {
            expanded.push(path.clone());
        }
    }
    Ok(expanded)
}
