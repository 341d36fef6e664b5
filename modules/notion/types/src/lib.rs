//! Notion API wire types shared by the sync client and its tests.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Notion rejects rich text items longer than this, counted in UTF-16
/// code units.
pub const MAX_RICH_TEXT_CHARS: usize = 2000;
/// Notion rejects blocks with more rich text items than this.
pub const MAX_RICH_TEXT_ITEMS: usize = 100;
/// Longest text one block can carry. Greedy chunking may leave a chunk one
/// unit short when an astral character does not fit, hence the `- 1`.
pub const MAX_BLOCK_TEXT_UNITS: usize = MAX_RICH_TEXT_ITEMS * (MAX_RICH_TEXT_CHARS - 1);

// =====================================================
// Request Types
// =====================================================

/// Body of `POST /v1/pages`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePageBody {
    pub parent: Parent,
    pub properties: PageProperties,
    pub children: Vec<Block>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover: Option<Cover>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parent {
    pub database_id: String,
}

/// Database properties written on page creation. The target database must
/// have a `Name` title column and a `Tags` multi-select column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageProperties {
    #[serde(rename = "Name")]
    pub name: TitleProperty,
    #[serde(rename = "Tags")]
    pub tags: MultiSelectProperty,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TitleProperty {
    pub title: Vec<RichText>,
}

impl TitleProperty {
    pub fn plain(content: &str) -> Self {
        Self {
            title: vec![RichText::plain(content)],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RichText {
    pub text: TextContent,
}

impl RichText {
    pub fn plain(content: &str) -> Self {
        Self {
            text: TextContent {
                content: content.to_string(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextContent {
    pub content: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MultiSelectProperty {
    pub multi_select: Vec<SelectOption>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub name: String,
}

/// Page cover image
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cover {
    #[serde(rename = "type")]
    pub cover_type: String,
    pub external: ExternalFile,
}

impl Cover {
    pub fn external(url: &str) -> Self {
        Self {
            cover_type: "external".to_string(),
            external: ExternalFile {
                url: url.to_string(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExternalFile {
    pub url: String,
}

// =====================================================
// Blocks
// =====================================================

/// A page content block. The schema is owned by Notion; the sync core
/// only passes blocks through.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Block(pub Value);

impl Block {
    pub fn paragraph(text: &str) -> Self {
        Self::text_block("paragraph", text)
    }

    /// Notion only has three heading levels; deeper headings collapse to 3.
    pub fn heading(level: usize, text: &str) -> Self {
        let kind = match level {
            0 | 1 => "heading_1",
            2 => "heading_2",
            _ => "heading_3",
        };
        Self::text_block(kind, text)
    }

    pub fn bulleted_item(text: &str) -> Self {
        Self::text_block("bulleted_list_item", text)
    }

    pub fn numbered_item(text: &str) -> Self {
        Self::text_block("numbered_list_item", text)
    }

    pub fn quote(text: &str) -> Self {
        Self::text_block("quote", text)
    }

    pub fn code(text: &str, language: &str) -> Self {
        Block(json!({
            "object": "block",
            "type": "code",
            "code": {
                "rich_text": rich_text_chunks(text),
                "language": language,
            }
        }))
    }

    pub fn divider() -> Self {
        Block(json!({
            "object": "block",
            "type": "divider",
            "divider": {}
        }))
    }

    /// The block's `type` field, if present.
    pub fn kind(&self) -> Option<&str> {
        self.0.get("type").and_then(Value::as_str)
    }

    fn text_block(kind: &str, text: &str) -> Self {
        let mut block = serde_json::Map::new();
        block.insert("object".to_string(), json!("block"));
        block.insert("type".to_string(), json!(kind));
        block.insert(kind.to_string(), json!({ "rich_text": rich_text_chunks(text) }));
        Block(Value::Object(block))
    }
}

/// Split text into rich text items that respect `MAX_RICH_TEXT_CHARS`.
fn rich_text_chunks(text: &str) -> Vec<Value> {
    split_utf16(text, MAX_RICH_TEXT_CHARS)
        .into_iter()
        .map(|chunk| {
            json!({
                "type": "text",
                "text": { "content": chunk }
            })
        })
        .collect()
}

/// Split text into pieces that each fit in a single block. Text longer than
/// `MAX_BLOCK_TEXT_UNITS` must be spread over several blocks.
pub fn split_block_text(text: &str) -> Vec<&str> {
    split_utf16(text, MAX_BLOCK_TEXT_UNITS)
}

/// Greedy split on char boundaries so no piece exceeds `limit` UTF-16 code
/// units. Empty text yields no pieces.
fn split_utf16(text: &str, limit: usize) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut start = 0;
    let mut units = 0;

    for (idx, ch) in text.char_indices() {
        let width = ch.len_utf16();
        if units + width > limit {
            pieces.push(&text[start..idx]);
            start = idx;
            units = 0;
        }
        units += width;
    }
    if start < text.len() {
        pieces.push(&text[start..]);
    }
    pieces
}

// =====================================================
// Response Types
// =====================================================

/// The subset of a page object the sync protocol reads back.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageObject {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

/// Error body returned by the Notion API on non-2xx responses.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub status: Option<u16>,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub message: String,
}
