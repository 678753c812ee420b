//! Document tree adapter built on `pulldown-cmark`.
//!
//! [`parse`] turns raw markdown (front-matter included) into a [`Tree`] of
//! typed block nodes; `Tree::to_markdown` turns it back into text. The
//! round-trip is the contract every transformation stage leans on:
//! `parse(text)` then serialize yields `normalize(text)`, where normalization
//! fixes the formatting choices (bullets `-`, rules `---`, ATX headings,
//! blocks separated by one blank line).
//!
//! The offset iterator drives parsing: every top-level event carries the byte
//! range of its whole block, so each node keeps its exact source slice and
//! serialization never has to re-render inline markup.

use crate::frontmatter;
use notepress_core::{Node, Result, Tree};
use pulldown_cmark::{Event, Options, Parser, Tag};
use regex::Regex;
use std::sync::LazyLock;

/// Unordered list markers normalized at parse time: `*` and `+` become `-`.
static LIST_BULLET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^(\s*)[*+](\s)").unwrap());

/// Parse raw markdown text into a document tree.
///
/// The front-matter block, when present, becomes the first node. Parsing is
/// total for well-formed UTF-8 input; the `Result` covers hosts feeding
/// structurally corrupt documents.
pub fn parse(text: &str) -> Result<Tree> {
    let mut nodes = Vec::new();

    let (front_matter, body) = frontmatter::extract(text);
    if let Some(value) = front_matter {
        nodes.push(Node::FrontMatter { value });
    }

    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);

    let mut depth = 0usize;
    let mut cursor = 0usize;
    let mut pending: Option<(BlockKind, std::ops::Range<usize>)> = None;

    for (event, range) in Parser::new_ext(body, options).into_offset_iter() {
        match event {
            Event::Start(tag) => {
                if depth == 0 {
                    push_gap(&mut nodes, &body[cursor..range.start]);
                    pending = Some((BlockKind::from_tag(&tag), range));
                }
                depth += 1;
            }
            Event::End(_) => {
                depth -= 1;
                if depth == 0
                    && let Some((kind, span)) = pending.take()
                {
                    cursor = span.end;
                    nodes.push(kind.into_node(&body[span]));
                }
            }
            Event::Rule if depth == 0 => {
                push_gap(&mut nodes, &body[cursor..range.start]);
                cursor = range.end;
                nodes.push(Node::ThematicBreak);
            }
            _ => {}
        }
    }
    push_gap(&mut nodes, &body[cursor..]);

    Ok(Tree::new(nodes))
}

/// Link-reference definitions produce no parser events; their source shows up
/// only as an unconsumed byte gap between top-level blocks. Keep such gaps as
/// nodes so reference-style links still resolve after serialization.
fn push_gap(nodes: &mut Vec<Node>, gap: &str) {
    let trimmed = gap.trim();
    if !trimmed.is_empty() {
        nodes.push(Node::LinkDefinition {
            source: trimmed.to_string(),
        });
    }
}

/// Serialize a tree back to markdown text.
///
/// Thin alias over `Tree::to_markdown`, kept so parse and serialize read as
/// one adapter.
pub fn serialize(tree: &Tree) -> String {
    tree.to_markdown()
}

/// Normalized form of raw text: one parse-serialize round trip.
pub fn normalize(text: &str) -> Result<String> {
    Ok(serialize(&parse(text)?))
}

/// Top-level block classification from a pulldown start tag.
enum BlockKind {
    Heading(u8),
    Paragraph,
    Blockquote,
    CodeFence,
    List,
    Table,
    Html,
}

impl BlockKind {
    fn from_tag(tag: &Tag<'_>) -> Self {
        match tag {
            Tag::Heading { level, .. } => BlockKind::Heading(*level as u8),
            Tag::BlockQuote(_) => BlockKind::Blockquote,
            Tag::CodeBlock(_) => BlockKind::CodeFence,
            Tag::List(_) => BlockKind::List,
            Tag::Table(_) => BlockKind::Table,
            Tag::HtmlBlock => BlockKind::Html,
            _ => BlockKind::Paragraph,
        }
    }

    fn into_node(self, slice: &str) -> Node {
        let source = slice.trim_end();
        match self {
            BlockKind::Heading(depth) => Node::Heading {
                depth,
                text: heading_text(source, depth),
            },
            BlockKind::Paragraph => Node::Paragraph {
                source: source.to_string(),
            },
            BlockKind::Blockquote => Node::Blockquote {
                source: source.to_string(),
            },
            BlockKind::CodeFence => Node::CodeFence {
                source: source.to_string(),
            },
            BlockKind::List => Node::List {
                source: LIST_BULLET.replace_all(source, "$1-$2").into_owned(),
            },
            BlockKind::Table => Node::Table {
                source: source.to_string(),
            },
            BlockKind::Html => Node::Html {
                source: source.to_string(),
            },
        }
    }
}

/// Inline source of a heading, markers stripped.
///
/// ATX headings drop the leading markers; setext headings keep their first
/// line and serialize back as ATX.
fn heading_text(source: &str, depth: u8) -> String {
    let line = source.lines().next().unwrap_or("");
    let trimmed = line.trim_start();
    match trimmed.strip_prefix(&"#".repeat(depth as usize)) {
        Some(rest) => rest.trim().to_string(),
        None => trimmed.trim_end().to_string(),
    }
}
