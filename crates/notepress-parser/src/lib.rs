//! # NotePress Parser
//!
//! Markdown parsing for the publishing pipeline, built on `pulldown-cmark`.
//!
//! This crate provides the three leaf components every destination shares:
//!
//! - [`tree`] — the Document Tree Adapter: `parse` raw markdown (front-matter
//!   included) into a [`notepress_core::Tree`] of typed block nodes, and
//!   serialize it back with stable formatting (bullets `-`, rules `---`, ATX
//!   headings, blocks separated by one blank line).
//! - [`links`] — the Link Resolver: scan text for wiki references (`[[Note]]`)
//!   and bracket links (`[text](url)`) and produce the substitution list the
//!   rewrite stage applies.
//! - [`frontmatter`] — the Metadata Accessor: extract and decode the YAML
//!   front-matter block into flat string values.
//!
//! ## Quick Start
//!
//! ```
//! use notepress_parser::{frontmatter, links, tree};
//!
//! let content = "---\npath: tech/my-post\n---\n\n# Title\n\nSee [[MyNote]].\n";
//!
//! let parsed = tree::parse(content).unwrap();
//! assert_eq!(parsed.front_matter_index(), Some(0));
//!
//! assert_eq!(frontmatter::get_value(content, "path"), "tech/my-post");
//!
//! let resolved = links::resolve_links(content, "attachments");
//! assert_eq!(resolved[0].name, "MyNote");
//! ```
//!
//! ## Round-trip contract
//!
//! `tree::serialize(&tree::parse(text)?)` equals `tree::normalize(text)?` for
//! any well-formed input, and normalization is idempotent. Every
//! transformation stage in `notepress-transform` leans on this: a stage that
//! only reads the tree leaves the serialized text untouched.
//!
//! ## Performance
//!
//! Regex patterns are compiled once behind `std::sync::LazyLock`, and the
//! resolver uses fast `contains` pre-filters so link-free documents skip the
//! regex pass entirely.

pub mod frontmatter;
pub mod links;
pub mod tree;

pub use frontmatter::{get_value, metadata};
pub use links::{MARKDOWN_LINK, WIKI_LINK, resolve_links};
pub use tree::{normalize, parse, serialize};

/// Convenient prelude for common imports.
pub mod prelude {
    pub use crate::frontmatter::{get_value, metadata};
    pub use crate::links::resolve_links;
    pub use crate::tree::{normalize, parse, serialize};
    pub use notepress_core::{Document, Node, NodeKind, ResolvedLink, Tree};
}
