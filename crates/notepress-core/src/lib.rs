//! # NotePress Core
//!
//! Core data models, error types, and configuration for the note publishing
//! system. This crate defines the canonical types that all other crates
//! depend on.
//!
//! ## Architecture Principles
//!
//! - **Type-Driven Design**: Strong types replace string-based APIs
//! - **Zero Panic in Libraries**: All errors are Result<T, Error>
//! - **Immutable by Default**: Documents and trees are values; edits return new values
//!
//! ## Core Modules
//!
//! - [`models`] - Document, tree, link, and action types
//! - [`error`] - Comprehensive error types and Result aliases
//! - [`config`] - Publishing configuration structures
//! - [`validation`] - Metadata validation gate
//! - [`host`] - Collaborator traits at the host boundary
//! - [`utils`] - Path validation helpers
//!
//! ## Usage Examples
//!
//! ### Working with Documents
//!
//! ```
//! use notepress_core::prelude::*;
//!
//! let tree = Tree::new(vec![
//!     Node::FrontMatter { value: "path: tech/my-post".to_string() },
//!     Node::Heading { depth: 1, text: "My Post".to_string() },
//! ]);
//! let doc = Document::new("My Post", "posts/My Post.md", tree);
//! assert_eq!(doc.tree.front_matter_index(), Some(0));
//! ```
//!
//! ### Error Handling
//!
//! ```
//! use notepress_core::prelude::*;
//!
//! fn run_pipeline() -> Result<()> {
//!     // All operations return Result<T>
//!     let _err = Error::parse_error("Invalid markdown content");
//!     Ok(())
//! }
//! ```
//!
//! ### Configuration
//!
//! ```
//! use notepress_core::prelude::*;
//!
//! let config = PublishConfig::default();
//! assert_eq!(config.vault, "content");
//! ```
//!
//! ## Type Safety
//!
//! The core types use enums and strong types instead of strings:
//!
//! - [`Action`] - The closed set of dispatchable actions
//! - [`NodeKind`] - Block-level node kinds for tree walks
//! - [`models`] - Rich data models for documents and links

pub mod config;
pub mod error;
pub mod host;
pub mod models;
pub mod utils;
pub mod validation;

pub use config::*;
pub use error::{Error, Result};
pub use host::{
    ClipboardSink, ConfirmGate, DocumentSource, ImagePreprocessor, NoopImagePreprocessor, Notifier,
};
pub use models::*;
pub use utils::PathValidator;
pub use validation::{Metadata, MetadataValidator, is_valid_slug, slug_segment};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::{
        BlogConfig, CommunityConfig, KnowledgeBaseConfig, PublishConfig, SiteConfig,
    };
    pub use crate::error::{Error, Result};
    pub use crate::host::{
        ClipboardSink, ConfirmGate, DocumentSource, ImagePreprocessor, NoopImagePreprocessor,
        Notifier,
    };
    pub use crate::models::{
        Action, Document, DocumentIdentity, DraftRef, Node, NodeKind, ResolvedLink, Tree,
    };
    pub use crate::utils::PathValidator;
    pub use crate::validation::{Metadata, MetadataValidator, is_valid_slug, slug_segment};
}
