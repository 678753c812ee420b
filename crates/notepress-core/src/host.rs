//! Collaborator traits at the host boundary.
//!
//! The pipeline never talks to an editor, a dialog box, or the system
//! clipboard directly. It goes through these traits, so the CLI can wire real
//! implementations while tests drop in fakes. Everything user-visible flows
//! through [`Notifier`]; a swallowed failure is a bug.

use crate::error::Result;
use crate::models::DocumentIdentity;
use async_trait::async_trait;

/// Supplies the active document's content and identity.
#[async_trait]
pub trait DocumentSource: Send + Sync {
    /// Raw text of the currently active document
    async fn read_active_document(&self) -> Result<String>;

    /// Name and path of the currently active document
    fn active_document_identity(&self) -> Result<DocumentIdentity>;
}

/// The single channel for user-visible status messages.
pub trait Notifier: Send + Sync {
    /// Surface a message to the user
    fn notify(&self, message: &str);
}

/// Two-button confirmation gate used before overwriting an existing
/// destination document. Returns `true` when the user confirms.
#[async_trait]
pub trait ConfirmGate: Send + Sync {
    async fn confirm(&self, message: &str) -> bool;
}

/// Writes final text to the system clipboard.
pub trait ClipboardSink: Send + Sync {
    fn set_text(&self, text: &str) -> Result<()>;
}

/// Rewrites image references before text transformation begins.
///
/// Image uploading itself is outside this system; hosts that upload images
/// plug in here. The default does nothing.
#[async_trait]
pub trait ImagePreprocessor: Send + Sync {
    async fn rewrite_images(&self, text: String) -> Result<String>;
}

/// Image preprocessor that passes text through untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopImagePreprocessor;

#[async_trait]
impl ImagePreprocessor for NoopImagePreprocessor {
    async fn rewrite_images(&self, text: String) -> Result<String> {
        Ok(text)
    }
}
