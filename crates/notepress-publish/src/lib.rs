//! # NotePress Publish
//!
//! The processor state machine and the destination commits.
//!
//! One [`Processor`] invocation runs a document through
//! validate → transform → dispatch. Validation and transformation are shared;
//! destinations differ only in their validation rules, their stage subset,
//! and what "commit" means:
//!
//! - [`BlogDestination`] — write into a local blog repository; publishing
//!   stages, commits, and pushes via git.
//! - [`KnowledgeBaseDestination`] — create or update a remote document by
//!   slug; publishing appends it to the remote table of contents.
//! - [`CommunityDestination`] — create or update a remote draft by title;
//!   publishing finalizes the draft.
//! - `COPY` never leaves the machine: the final text lands on the clipboard
//!   ([`SystemClipboard`]).
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use notepress_core::{Action, PublishConfig};
//! use notepress_publish::{BlogDestination, Processor, SystemClipboard};
//! # use notepress_core::{DocumentIdentity, DocumentSource, Notifier, ConfirmGate, Result};
//! # struct Host;
//! # #[async_trait::async_trait]
//! # impl DocumentSource for Host {
//! #     async fn read_active_document(&self) -> Result<String> { Ok(String::new()) }
//! #     fn active_document_identity(&self) -> Result<DocumentIdentity> {
//! #         Ok(DocumentIdentity { name: "n".into(), path: "n.md".into() })
//! #     }
//! # }
//! # impl Notifier for Host { fn notify(&self, _: &str) {} }
//! # #[async_trait::async_trait]
//! # impl ConfirmGate for Host { async fn confirm(&self, _: &str) -> bool { true } }
//!
//! # async fn example() -> Result<()> {
//! let config = PublishConfig::default();
//! let host = Arc::new(Host);
//! let destination = BlogDestination::new(config.clone(), host.clone());
//!
//! let processor = Processor::new(
//!     config,
//!     Box::new(destination),
//!     host.clone(),
//!     host,
//!     Arc::new(SystemClipboard),
//! );
//! processor.process(Action::Create).await?;
//! # Ok(())
//! # }
//! ```

pub mod blog;
pub mod clipboard;
pub mod community;
pub mod knowledge_base;
pub mod processor;

pub use blog::BlogDestination;
pub use clipboard::SystemClipboard;
pub use community::CommunityDestination;
pub use knowledge_base::KnowledgeBaseDestination;
pub use processor::{CommitOutcome, Destination, Processor, ProcessorState};

pub mod prelude {
    pub use crate::blog::BlogDestination;
    pub use crate::clipboard::SystemClipboard;
    pub use crate::community::CommunityDestination;
    pub use crate::knowledge_base::KnowledgeBaseDestination;
    pub use crate::processor::{CommitOutcome, Destination, Processor, ProcessorState};
    pub use notepress_core::prelude::*;
}
