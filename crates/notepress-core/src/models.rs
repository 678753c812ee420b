//! Core data models for the publishing pipeline.
//!
//! These types are designed to be:
//! - **Serializable**: All types derive Serialize/Deserialize
//! - **Debuggable**: Derive Debug for easy inspection
//! - **Type-Safe**: Enums replace magic strings
//!
//! The central type is [`Document`]: one author note flowing through the
//! transformation stages as an immutable value. Stages consume a document and
//! return a new one; nothing here mutates in place.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The action requested for one `process()` invocation.
///
/// A closed set: anything else is rejected as an invalid action before
/// validation even starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Action {
    /// Create-or-update a destination-side draft or file
    Create,
    /// Finalize a draft, append to a remote table of contents, or commit-and-push
    Publish,
    /// Copy the final text to the clipboard
    Copy,
}

impl FromStr for Action {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "CREATE" => Ok(Action::Create),
            "PUBLISH" => Ok(Action::Publish),
            "COPY" => Ok(Action::Copy),
            _ => Err(Error::invalid_action(s)),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Create => write!(f, "CREATE"),
            Action::Publish => write!(f, "PUBLISH"),
            Action::Copy => write!(f, "COPY"),
        }
    }
}

/// Kind discriminant for [`Node`], used by tree walks and stage lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    FrontMatter,
    Heading,
    Paragraph,
    Blockquote,
    CodeFence,
    List,
    Table,
    ThematicBreak,
    Html,
    LinkDefinition,
}

/// A block-level node of the document tree.
///
/// Every variant keeps enough source text to serialize deterministically.
/// Normalization (bullet and rule characters, ATX headings) happens at parse
/// time, so serialization is a plain join of block sources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Node {
    /// The metadata block at the top of a document. `value` is the raw
    /// key-value text between the delimiters, with no trailing newline.
    FrontMatter { value: String },
    /// A heading (# H1, ## H2, etc.). `text` is the inline source after the
    /// markers, kept verbatim so links inside headings survive round-trips.
    Heading { depth: u8, text: String },
    /// A paragraph of text
    Paragraph { source: String },
    /// A blockquote (> text), callouts included
    Blockquote { source: String },
    /// A fenced code block, fences included
    CodeFence { source: String },
    /// An ordered or unordered list, bullets already normalized to `-`
    List { source: String },
    /// A pipe table
    Table { source: String },
    /// A horizontal rule, serialized as `---`
    ThematicBreak,
    /// A raw HTML block, passed through untouched
    Html { source: String },
    /// One or more link-reference definitions (`[label]: url`), kept verbatim
    /// so reference-style links in other blocks still resolve
    LinkDefinition { source: String },
}

impl Node {
    /// The kind discriminant for this node
    pub fn kind(&self) -> NodeKind {
        match self {
            Node::FrontMatter { .. } => NodeKind::FrontMatter,
            Node::Heading { .. } => NodeKind::Heading,
            Node::Paragraph { .. } => NodeKind::Paragraph,
            Node::Blockquote { .. } => NodeKind::Blockquote,
            Node::CodeFence { .. } => NodeKind::CodeFence,
            Node::List { .. } => NodeKind::List,
            Node::Table { .. } => NodeKind::Table,
            Node::ThematicBreak => NodeKind::ThematicBreak,
            Node::Html { .. } => NodeKind::Html,
            Node::LinkDefinition { .. } => NodeKind::LinkDefinition,
        }
    }

    /// Serialize this node back to markdown (no trailing newline)
    pub fn to_markdown(&self) -> String {
        match self {
            Node::FrontMatter { value } => format!("---\n{}\n---", value),
            Node::Heading { depth, text } => {
                format!("{} {}", "#".repeat(*depth as usize), text)
            }
            Node::ThematicBreak => "---".to_string(),
            Node::Paragraph { source }
            | Node::Blockquote { source }
            | Node::CodeFence { source }
            | Node::List { source }
            | Node::Table { source }
            | Node::Html { source }
            | Node::LinkDefinition { source } => source.clone(),
        }
    }

    /// Heading text if this node is a heading
    pub fn heading_text(&self) -> Option<&str> {
        match self {
            Node::Heading { text, .. } => Some(text.as_str()),
            _ => None,
        }
    }
}

/// An ordered sequence of block-level nodes.
///
/// Invariant: at most one front-matter node, and if present it is the first
/// node. The parser establishes this; edit methods return new trees instead of
/// splicing in place, so a stage can never invalidate indices another stage
/// already discovered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    /// Create a tree from parsed nodes
    pub fn new(nodes: Vec<Node>) -> Self {
        Self { nodes }
    }

    /// All nodes in document order
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Number of top-level nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree has no nodes
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Index of the front-matter node, if present
    pub fn front_matter_index(&self) -> Option<usize> {
        self.nodes
            .iter()
            .position(|n| n.kind() == NodeKind::FrontMatter)
    }

    /// Raw front-matter value, if present
    pub fn front_matter(&self) -> Option<&str> {
        self.nodes.iter().find_map(|n| match n {
            Node::FrontMatter { value } => Some(value.as_str()),
            _ => None,
        })
    }

    /// Index of the first heading node, if any
    pub fn first_heading_index(&self) -> Option<usize> {
        self.nodes
            .iter()
            .position(|n| n.kind() == NodeKind::Heading)
    }

    /// Index of the first heading whose text equals `text` exactly
    pub fn heading_index(&self, text: &str) -> Option<usize> {
        self.nodes
            .iter()
            .position(|n| n.heading_text() == Some(text))
    }

    /// Visit nodes of one kind in document order, with their indices
    pub fn walk(&self, kind: NodeKind) -> impl Iterator<Item = (usize, &Node)> {
        self.nodes
            .iter()
            .enumerate()
            .filter(move |(_, n)| n.kind() == kind)
    }

    /// New tree with `node` inserted at `index` (clamped to the node count)
    pub fn with_inserted(&self, index: usize, node: Node) -> Tree {
        let mut nodes = self.nodes.clone();
        nodes.insert(index.min(nodes.len()), node);
        Tree { nodes }
    }

    /// New tree with the node at `index` removed
    pub fn without(&self, index: usize) -> Tree {
        let mut nodes = self.nodes.clone();
        if index < nodes.len() {
            nodes.remove(index);
        }
        Tree { nodes }
    }

    /// New tree with the node at `index` replaced
    pub fn with_replaced(&self, index: usize, node: Node) -> Tree {
        let mut nodes = self.nodes.clone();
        if index < nodes.len() {
            nodes[index] = node;
        }
        Tree { nodes }
    }

    /// New tree keeping only nodes before `index`
    pub fn truncated(&self, index: usize) -> Tree {
        let mut nodes = self.nodes.clone();
        nodes.truncate(index);
        Tree { nodes }
    }

    /// Serialize the tree back to markdown text.
    ///
    /// Total and deterministic: block sources joined by blank lines, with a
    /// single trailing newline. Identical trees always produce byte-identical
    /// text.
    pub fn to_markdown(&self) -> String {
        if self.nodes.is_empty() {
            return String::new();
        }
        let blocks: Vec<String> = self.nodes.iter().map(|n| n.to_markdown()).collect();
        format!("{}\n", blocks.join("\n\n"))
    }
}

/// The unit of work: one author note moving through the pipeline.
///
/// `name` is the note's basename (used as the published title), `path` is the
/// workspace-relative file path (used to build the host-open URL). The tree is
/// replaced wholesale by each transformation stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub name: String,
    pub path: String,
    pub tree: Tree,
}

impl Document {
    /// Create a document from its identity and parsed tree
    pub fn new(name: impl Into<String>, path: impl Into<String>, tree: Tree) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            tree,
        }
    }

    /// Current text of the document (serialized tree)
    pub fn text(&self) -> String {
        self.tree.to_markdown()
    }

    /// Same document with a new tree
    pub fn with_tree(&self, tree: Tree) -> Document {
        Document {
            name: self.name.clone(),
            path: self.path.clone(),
            tree,
        }
    }
}

/// One link found by the resolver: what was matched, what to display, where it
/// points. `full_path` is reserved for hosts that can resolve absolute file
/// paths; the resolver never sets it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedLink {
    pub name: String,
    pub path: String,
    pub source: String,
    pub full_path: Option<String>,
}

impl ResolvedLink {
    /// Create a resolved link with `full_path` unset
    pub fn new(
        name: impl Into<String>,
        path: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            source: source.into(),
            full_path: None,
        }
    }
}

/// Identity of the currently active document as reported by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentIdentity {
    /// Basename without extension
    pub name: String,
    /// Workspace-relative path, extension included
    pub path: String,
}

/// Correlation key for a document that already exists at a destination,
/// resolved lazily by listing the destination's drafts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftRef {
    /// Destination-assigned identifier
    pub id: String,
    /// Title as the destination knows it
    pub title: String,
    /// URL-safe slug, for destinations that key by slug
    pub slug: Option<String>,
}
