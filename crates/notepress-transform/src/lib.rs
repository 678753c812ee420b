//! # NotePress Transform
//!
//! The fixed, ordered set of tree-rewriting operations applied between
//! validation and dispatch. Each destination names its own subset of
//! [`Stage`]s; the processor applies them in order with [`apply_stages`].
//!
//! Every stage is a pure function from [`Document`] to [`Document`]: it takes
//! the value, returns a new one, and never touches anything outside it. That
//! keeps ordering dependencies explicit and lets each stage be tested in
//! isolation.
//!
//! ## Quick Start
//!
//! ```
//! use notepress_core::{Document, PublishConfig};
//! use notepress_parser::tree;
//! use notepress_transform::{Stage, apply_stages};
//!
//! # fn example() -> notepress_core::Result<()> {
//! let text = "---\npath: tech/my-post\n---\n\n# Title\n\n> [!note] draft\n\nbody\n";
//! let doc = Document::new("Title", "posts/Title.md", tree::parse(text)?);
//!
//! let config = PublishConfig::default();
//! let out = apply_stages(doc, &[Stage::StripCallouts, Stage::InsertToc], &config)?;
//! assert!(out.text().contains("## 目录"));
//! # Ok(())
//! # }
//! ```

mod stages;

pub use stages::{
    FURTHER_READING_MARKER, PLATFORM_METADATA_KEYS, TOC_TITLE, append_platform_metadata,
    inject_origin_notice, insert_toc, rewrite_links, strip_callouts, strip_front_matter,
    truncate_further_reading,
};

use notepress_core::{Document, PublishConfig, Result};

/// One transformation stage, named for what it does to the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Drop the further-reading heading and everything after it
    TruncateFurtherReading,
    /// Remove callout marker lines from blockquotes
    StripCallouts,
    /// Replace resolved link sources with their display names
    RewriteLinks,
    /// Insert the origin-notice blockquote before the first heading
    InjectOriginNotice,
    /// Insert the table-of-contents heading after the front-matter
    InsertToc,
    /// Append title and host-open URL into the front-matter
    AppendPlatformMetadata,
    /// Remove the front-matter node entirely
    StripFrontMatter,
}

/// Apply an ordered list of stages to a document.
///
/// Stage order is the destination's contract; this function never reorders or
/// deduplicates. Each application is logged so a failed publish can be traced
/// to the exact rewrite that produced its output.
pub fn apply_stages(doc: Document, stages: &[Stage], config: &PublishConfig) -> Result<Document> {
    let mut current = doc;
    for stage in stages {
        tracing::debug!(stage = ?stage, document = %current.name, "applying stage");
        current = match stage {
            Stage::TruncateFurtherReading => truncate_further_reading(current),
            Stage::StripCallouts => strip_callouts(current)?,
            Stage::RewriteLinks => rewrite_links(current, &config.attachment_location)?,
            Stage::InjectOriginNotice => {
                inject_origin_notice(current, &config.site.base_url, &config.site.feed_url)
            }
            Stage::InsertToc => insert_toc(current),
            Stage::AppendPlatformMetadata => append_platform_metadata(current, &config.vault),
            Stage::StripFrontMatter => strip_front_matter(current),
        };
    }
    Ok(current)
}
