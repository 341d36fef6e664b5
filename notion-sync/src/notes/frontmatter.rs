//! Parse and generate YAML frontmatter for synced notes.
//!
//! `parse` splits a note into its header mapping and body. `to_text` writes
//! it back by patching only the lines of keys changed through `set`, so
//! comments, quoting and layout of everything else survive byte-for-byte.
//! Reserved keys: `notionID`, `link`, `tags`.

use crate::error::SyncError;
use serde_yaml::{Mapping, Value};

pub const NOTION_ID_KEY: &str = "notionID";
pub const LINK_KEY: &str = "link";
pub const TAGS_KEY: &str = "tags";

const DELIMITER: &str = "---";

/// A note split into its frontmatter mapping and body.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrontMatter {
    pub mapping: Mapping,
    /// Everything after the closing `---`, including that line's own break.
    pub body: String,
    /// Header text as read, between the delimiters.
    header: Option<String>,
    /// Keys changed through `set`, in call order.
    edited: Vec<String>,
}

impl FrontMatter {
    fn body_only(text: &str) -> Self {
        Self {
            body: text.to_string(),
            ..Default::default()
        }
    }

    pub fn notion_id(&self) -> Option<&str> {
        notion_id(&self.mapping)
    }

    /// Insert or overwrite a key. Existing keys keep their position.
    pub fn set(&mut self, key: &str, value: impl Into<Value>) {
        self.mapping.insert(Value::String(key.to_string()), value.into());
        if !self.edited.iter().any(|k| k == key) {
            self.edited.push(key.to_string());
        }
    }

    /// Render the note. The original header is kept and only edited keys
    /// are rewritten; the whole header is re-rendered when that cannot be
    /// done safely.
    pub fn to_text(&self) -> Result<String, SyncError> {
        if let (Some(header), false) = (self.header.as_deref(), self.mapping.is_empty()) {
            match self.patch_header(header) {
                Some(patched) => {
                    let body = strip_line_break(&self.body).unwrap_or(&self.body);
                    let patched = patched.strip_suffix('\n').unwrap_or(&patched);
                    let patched = patched.strip_suffix('\r').unwrap_or(patched);
                    return Ok(format!("{DELIMITER}\n{patched}\n{DELIMITER}\n{body}"));
                }
                None => log::debug!("[FRONTMATTER] Header cannot be patched in place, re-rendering"),
            }
        }
        serialize(&self.mapping, &self.body)
    }

    /// Replace the line of each edited key, or append one when the key is
    /// new. `None` when an existing value spans several lines or the result
    /// does not read back as `mapping`.
    fn patch_header(&self, header: &str) -> Option<String> {
        let newline = if header.contains("\r\n") { "\r\n" } else { "\n" };
        let mut lines: Vec<String> = header.lines().map(str::to_string).collect();

        for key in &self.edited {
            let value = self.mapping.get(key.as_str())?;
            let rendered = serde_yaml::to_string(value).ok()?;
            let rendered = rendered.strip_suffix('\n').unwrap_or(&rendered);
            if rendered.contains('\n') {
                return None;
            }
            let entry = format!("{key}: {rendered}");

            match lines.iter().position(|line| is_key_line(line, key)) {
                Some(i) => {
                    if lines.get(i + 1).is_some_and(|next| is_continuation(next)) {
                        return None;
                    }
                    lines[i] = entry;
                }
                None => lines.push(entry),
            }
        }

        let mut patched = String::new();
        for line in &lines {
            patched.push_str(line);
            patched.push_str(newline);
        }

        match serde_yaml::from_str::<Value>(&patched) {
            Ok(Value::Mapping(mapping)) if mapping == self.mapping => Some(patched),
            _ => None,
        }
    }
}

/// A top-level `key:` line.
fn is_key_line(line: &str, key: &str) -> bool {
    line.strip_prefix(key)
        .is_some_and(|rest| rest.trim_start_matches([' ', '\t']).starts_with(':'))
}

/// A line that belongs to the value of the key above it.
fn is_continuation(line: &str) -> bool {
    line.starts_with([' ', '\t']) || line == "-" || line.starts_with("- ")
}

/// Parse a note, recovering from a malformed header by treating the whole
/// text as body.
pub fn parse(text: &str) -> FrontMatter {
    try_parse(text).unwrap_or_else(|e| {
        log::debug!("[FRONTMATTER] {}; treating note as body-only", e);
        FrontMatter::body_only(text)
    })
}

/// Strict variant of [`parse`]: an unterminated header or a header that is
/// not a YAML mapping is an error.
pub fn try_parse(text: &str) -> Result<FrontMatter, SyncError> {
    let Some((header, body)) = split(text)? else {
        return Ok(FrontMatter::body_only(text));
    };

    let mapping = match serde_yaml::from_str::<Value>(header) {
        Ok(Value::Mapping(mapping)) => mapping,
        // Empty or comment-only header
        Ok(Value::Null) => Mapping::new(),
        Ok(_) => return Err(SyncError::Parse("frontmatter is not a mapping".to_string())),
        Err(e) => return Err(SyncError::Parse(format!("invalid frontmatter YAML: {}", e))),
    };

    Ok(FrontMatter {
        mapping,
        body: body.to_string(),
        header: Some(header.to_string()),
        edited: Vec::new(),
    })
}

/// Render a mapping and body into note text from scratch.
///
/// Exactly one trailing newline is trimmed from the rendered YAML and exactly
/// one leading line break from the body, so repeated rewrites do not grow
/// blank lines. An empty mapping renders the body alone.
pub fn serialize(mapping: &Mapping, body: &str) -> Result<String, SyncError> {
    let body = strip_line_break(body).unwrap_or(body);
    if mapping.is_empty() {
        return Ok(body.to_string());
    }

    let yaml = serde_yaml::to_string(mapping)
        .map_err(|e| SyncError::Persistence(format!("failed to render frontmatter: {}", e)))?;
    let yaml = yaml.strip_suffix('\n').unwrap_or(&yaml);

    Ok(format!("{DELIMITER}\n{yaml}\n{DELIMITER}\n{body}"))
}

/// The stored Notion page id. Blank or non-string values count as absent.
pub fn notion_id(mapping: &Mapping) -> Option<&str> {
    match mapping.get(NOTION_ID_KEY) {
        Some(Value::String(id)) => Some(id.trim()).filter(|id| !id.is_empty()),
        _ => None,
    }
}

/// User-authored tags. Accepts a list or a comma-separated string; a leading
/// `#` is dropped. Absent or null means no tags.
pub fn tags(mapping: &Mapping) -> Result<Vec<String>, String> {
    let raw: Vec<String> = match mapping.get(TAGS_KEY) {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::String(s)) => s.split(',').map(str::to_string).collect(),
        Some(Value::Sequence(items)) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => Ok(s.clone()),
                Value::Number(n) => Ok(n.to_string()),
                Value::Bool(b) => Ok(b.to_string()),
                other => Err(format!("unsupported tag value: {:?}", other)),
            })
            .collect::<Result<_, _>>()?,
        Some(other) => return Err(format!("`tags` must be a list, got {:?}", other)),
    };

    Ok(raw
        .iter()
        .map(|t| t.trim().trim_start_matches('#').to_string())
        .filter(|t| !t.is_empty())
        .collect())
}

/// Split off the header. `Ok(None)` when the text has no opening delimiter.
fn split(text: &str) -> Result<Option<(&str, &str)>, SyncError> {
    let Some(rest) = text.strip_prefix(DELIMITER).and_then(strip_line_break) else {
        return Ok(None);
    };

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end_matches(['\r', '\n']) == DELIMITER {
            let header = &rest[..offset];
            let body = &rest[offset + DELIMITER.len()..];
            return Ok(Some((header, body)));
        }
        offset += line.len();
    }

    Err(SyncError::Parse("unterminated frontmatter header".to_string()))
}

fn strip_line_break(s: &str) -> Option<&str> {
    s.strip_prefix("\r\n").or_else(|| s.strip_prefix('\n'))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(k: &str) -> Value {
        Value::String(k.to_string())
    }

    #[test]
    fn test_parse_note_with_frontmatter() {
        let content = "---\ntitle: Test Note\ntags: [crypto, payments]\nnotionID: abc\n---\n# Heading\n\nBody";
        let fm = parse(content);
        assert_eq!(fm.mapping.get("title"), Some(&key("Test Note")));
        assert_eq!(fm.notion_id(), Some("abc"));
        assert_eq!(tags(&fm.mapping).unwrap(), vec!["crypto", "payments"]);
        assert_eq!(fm.body, "\n# Heading\n\nBody");
    }

    #[test]
    fn test_parse_note_no_frontmatter() {
        let content = "# Just a heading\n\nSome body text.";
        let fm = parse(content);
        assert!(fm.mapping.is_empty());
        assert_eq!(fm.body, content);
    }

    #[test]
    fn test_unterminated_header_is_body_only() {
        let content = "---\ntitle: oops\n\nno closing delimiter";
        assert!(matches!(try_parse(content), Err(SyncError::Parse(_))));

        let fm = parse(content);
        assert!(fm.mapping.is_empty());
        assert_eq!(fm.body, content);
    }

    #[test]
    fn test_non_mapping_header_is_body_only() {
        let content = "---\n- just\n- a list\n---\nBody";
        let fm = parse(content);
        assert!(fm.mapping.is_empty());
        assert_eq!(fm.body, content);

        let broken = "---\nkey: [unclosed\n---\nBody";
        assert!(parse(broken).mapping.is_empty());
    }

    #[test]
    fn test_delimiter_must_be_a_whole_line() {
        let content = "----\ntitle: x\n---\nBody";
        assert_eq!(parse(content).body, content);

        let content = "---\ntitle: x\nnote: |\n  ----\n  ---\n---\nBody";
        let fm = parse(content);
        assert_eq!(fm.body, "\nBody");
    }

    #[test]
    fn test_empty_header() {
        let fm = parse("---\n---\nBody");
        assert!(fm.mapping.is_empty());
        assert_eq!(fm.body, "\nBody");
    }

    #[test]
    fn test_crlf_header() {
        let fm = parse("---\r\nnotionID: p1\r\n---\r\nBody\r\n");
        assert_eq!(fm.notion_id(), Some("p1"));
        assert_eq!(fm.body, "\r\nBody\r\n");
        assert_eq!(fm.to_text().unwrap(), "---\nnotionID: p1\n---\nBody\r\n");
    }

    #[test]
    fn test_serialize_trims_single_newlines() {
        let mut mapping = Mapping::new();
        mapping.insert(key("notionID"), key("p1"));
        let text = serialize(&mapping, "\n# Notes\n").unwrap();
        assert_eq!(text, "---\nnotionID: p1\n---\n# Notes\n");

        // Only one leading break is removed
        let text = serialize(&mapping, "\n\nBody").unwrap();
        assert_eq!(text, "---\nnotionID: p1\n---\n\nBody");
    }

    #[test]
    fn test_serialize_empty_mapping_is_body() {
        assert_eq!(serialize(&Mapping::new(), "Body").unwrap(), "Body");
    }

    #[test]
    fn test_round_trip() {
        let mut mapping = Mapping::new();
        mapping.insert(key("title"), key("Round Trip"));
        mapping.insert(key("aliases"), Value::Sequence(vec![key("rt"), key("trip")]));
        mapping.insert(key("draft"), Value::Bool(true));
        mapping.insert(key("weight"), Value::Number(serde_yaml::Number::from(3u64)));
        let body = "\n# Title\n\nparagraph\n";

        let text = serialize(&mapping, body).unwrap();
        let parsed = parse(&text);
        assert_eq!(parsed.mapping, mapping);
        assert_eq!(parsed.body, body);
    }

    #[test]
    fn test_rewrite_is_stable() {
        let original = "---\ntitle: Stable\nnotionID: p1\nextra:\n  nested: 1\n---\n\n# Body\n";
        let first = parse(original).to_text().unwrap();
        let second = parse(&first).to_text().unwrap();
        assert_eq!(first, second);
        assert_eq!(parse(&second).body, parse(original).body);
    }

    #[test]
    fn test_set_keeps_key_order() {
        let mut fm = parse("---\nnotionID: old\ntitle: T\n---\nBody");
        fm.set(LINK_KEY, "https://www.notion.so/new");
        fm.set(NOTION_ID_KEY, "new");

        let keys: Vec<&str> = fm.mapping.keys().filter_map(Value::as_str).collect();
        assert_eq!(keys, vec!["notionID", "title", "link"]);
        assert_eq!(fm.notion_id(), Some("new"));
    }

    #[test]
    fn test_to_text_keeps_user_header_verbatim() {
        let original = "---\n# reviewed by me\ntitle: 'Quoted'\ntags: [a, b]\ncreated: 2024-01-05\n---\nBody\n";
        let mut fm = parse(original);
        fm.set(LINK_KEY, "https://www.notion.so/p1");
        fm.set(NOTION_ID_KEY, "p1");

        let text = fm.to_text().unwrap();
        assert!(text.starts_with(
            "---\n# reviewed by me\ntitle: 'Quoted'\ntags: [a, b]\ncreated: 2024-01-05\n"
        ));
        assert!(text.ends_with("\n---\nBody\n"));

        let reparsed = parse(&text);
        assert_eq!(reparsed.notion_id(), Some("p1"));
        let keys: Vec<&str> = reparsed.mapping.keys().filter_map(Value::as_str).collect();
        assert_eq!(keys, vec!["title", "tags", "created", "link", "notionID"]);
    }

    #[test]
    fn test_to_text_replaces_reserved_lines_in_place() {
        let original = "---\nnotionID: old # last sync\ntitle: \"T\"\nlink: https://www.notion.so/old\nextra: {x: 1}\n---\nBody";
        let mut fm = parse(original);
        fm.set(LINK_KEY, "https://www.notion.so/new");
        fm.set(NOTION_ID_KEY, "new");

        let text = fm.to_text().unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[1].starts_with("notionID: "));
        assert_eq!(lines[2], "title: \"T\"");
        assert!(lines[3].starts_with("link: "));
        assert_eq!(lines[4], "extra: {x: 1}");
        assert_eq!(lines.len(), 7);

        let reparsed = parse(&text);
        assert_eq!(reparsed.notion_id(), Some("new"));
        assert_eq!(
            reparsed.mapping.get(LINK_KEY).and_then(Value::as_str),
            Some("https://www.notion.so/new")
        );
    }

    #[test]
    fn test_to_text_multiline_reserved_value_rerenders() {
        let mut fm = parse("---\ntitle: T\nnotionID:\n  - stale\n---\nBody");
        fm.set(NOTION_ID_KEY, "p1");

        let text = fm.to_text().unwrap();
        assert!(!text.contains("stale"));
        let reparsed = parse(&text);
        assert_eq!(reparsed.notion_id(), Some("p1"));
        assert_eq!(reparsed.mapping.get("title").and_then(Value::as_str), Some("T"));
    }

    #[test]
    fn test_to_text_unedited_header_is_unchanged() {
        let original = "---\n# comment\naliases: [\"x\", 'y']\n---\n\n# Body\n";
        assert_eq!(parse(original).to_text().unwrap(), original);
    }

    #[test]
    fn test_notion_id_blank_or_malformed() {
        assert_eq!(parse("---\nnotionID: \"  \"\n---\n").notion_id(), None);
        assert_eq!(parse("---\nnotionID:\n---\n").notion_id(), None);
        assert_eq!(parse("---\nnotionID: 42\n---\n").notion_id(), None);
        assert_eq!(parse("---\nnotionID: [a]\n---\n").notion_id(), None);
        assert_eq!(parse("---\nnotionID: \" p1 \"\n---\n").notion_id(), Some("p1"));
    }

    #[test]
    fn test_tags_variants() {
        assert!(tags(&parse("---\ntitle: x\n---\n").mapping).unwrap().is_empty());
        assert_eq!(tags(&parse("---\ntags: \"rust, #web\"\n---\n").mapping).unwrap(), vec!["rust", "web"]);
        assert_eq!(tags(&parse("---\ntags:\n  - a\n  - 2024\n---\n").mapping).unwrap(), vec!["a", "2024"]);
        assert!(tags(&parse("---\ntags:\n  k: v\n---\n").mapping).is_err());
    }
}
