//! Markdown body → Notion blocks.
//!
//! The sync core treats conversion as an opaque function behind
//! `BlockConverter`. `MarkdownConverter` is a small line-based default:
//! headings, lists, quotes, fenced code, dividers and paragraphs. Inline
//! formatting is sent as plain text.

use notion_types::{Block, split_block_text};
use regex::Regex;
use std::sync::LazyLock;

pub trait BlockConverter: Send + Sync {
    fn to_blocks(&self, markdown: &str) -> Vec<Block>;
}

static HEADING_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(#{1,6})\s+(.*)$").unwrap());
static BULLET_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*[-*+]\s+(.*)$").unwrap());
static NUMBERED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*\d+[.)]\s+(.*)$").unwrap());
static DIVIDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(?:-{3,}|\*{3,}|_{3,})\s*$").unwrap());

#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownConverter;

impl BlockConverter for MarkdownConverter {
    fn to_blocks(&self, markdown: &str) -> Vec<Block> {
        let mut blocks = Vec::new();
        let mut paragraph: Vec<&str> = Vec::new();
        let mut lines = markdown.lines();

        while let Some(line) = lines.next() {
            let trimmed = line.trim_end();

            if let Some(fence_lang) = trimmed.trim_start().strip_prefix("```") {
                flush_paragraph(&mut paragraph, &mut blocks);
                let mut code = Vec::new();
                for code_line in lines.by_ref() {
                    if code_line.trim_start().starts_with("```") {
                        break;
                    }
                    code.push(code_line);
                }
                let language = code_language(fence_lang);
                blocks.extend(split_into(&code.join("\n"), |text| Block::code(text, language)));
                continue;
            }

            if trimmed.trim().is_empty() {
                flush_paragraph(&mut paragraph, &mut blocks);
                continue;
            }

            let converted = if DIVIDER_RE.is_match(trimmed) {
                Some(vec![Block::divider()])
            } else if let Some(cap) = HEADING_RE.captures(trimmed) {
                let level = cap[1].len();
                Some(split_into(cap[2].trim(), |text| Block::heading(level, text)))
            } else if let Some(cap) = BULLET_RE.captures(trimmed) {
                Some(split_into(cap[1].trim(), Block::bulleted_item))
            } else if let Some(cap) = NUMBERED_RE.captures(trimmed) {
                Some(split_into(cap[1].trim(), Block::numbered_item))
            } else {
                trimmed
                    .trim_start()
                    .strip_prefix('>')
                    .map(|quote| split_into(quote.trim(), Block::quote))
            };

            match converted {
                Some(converted) => {
                    flush_paragraph(&mut paragraph, &mut blocks);
                    blocks.extend(converted);
                }
                None => paragraph.push(trimmed.trim_start()),
            }
        }

        flush_paragraph(&mut paragraph, &mut blocks);
        blocks
    }
}

fn flush_paragraph(paragraph: &mut Vec<&str>, blocks: &mut Vec<Block>) {
    if !paragraph.is_empty() {
        blocks.extend(split_into(&paragraph.join("\n"), Block::paragraph));
        paragraph.clear();
    }
}

/// One block per piece of text that fits Notion's per-block limit.
fn split_into(text: &str, make: impl Fn(&str) -> Block) -> Vec<Block> {
    let pieces = split_block_text(text);
    if pieces.is_empty() {
        return vec![make("")];
    }
    pieces.into_iter().map(make).collect()
}

/// Notion only accepts languages from a fixed list; unknown fences become
/// "plain text".
fn code_language(fence: &str) -> &'static str {
    match fence.trim().to_lowercase().as_str() {
        "rust" | "rs" => "rust",
        "js" | "javascript" => "javascript",
        "ts" | "typescript" => "typescript",
        "py" | "python" => "python",
        "sh" | "bash" | "shell" | "zsh" => "shell",
        "json" => "json",
        "yaml" | "yml" => "yaml",
        "toml" => "toml",
        "go" => "go",
        "java" => "java",
        "c" => "c",
        "cpp" | "c++" => "c++",
        "html" => "html",
        "css" => "css",
        "sql" => "sql",
        "markdown" | "md" => "markdown",
        _ => "plain text",
    }
}
