//! The dispatch state machine shared by every destination.
//!
//! `Idle → Validating → Transforming → Dispatching → {Committed | Rejected}`,
//! with every transition logged and every terminal state surfaced through the
//! notifier. The document is owned by one invocation and discarded at the
//! end; only the destination keeps the derived output.

use async_trait::async_trait;
use notepress_core::{
    Action, ClipboardSink, Document, DocumentSource, Error, ImagePreprocessor, Metadata,
    MetadataValidator, NoopImagePreprocessor, Notifier, PublishConfig, Result,
};
use notepress_parser::{frontmatter, tree};
use notepress_transform::{Stage, apply_stages};
use std::sync::Arc;

/// States of one `process()` invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessorState {
    Idle,
    Validating,
    Transforming,
    Dispatching,
    Committed,
    Rejected,
}

/// Result of a destination commit.
///
/// Cancellation is not an error: a declined confirmation gate ends the
/// invocation in `Rejected` with no destination call made.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitOutcome {
    /// The destination received the document; message is user-facing.
    Committed(String),
    /// The user declined the overwrite gate; nothing was written.
    Cancelled(String),
}

/// Destination capability: validation rules, stage subset, and the commit.
///
/// One implementation per destination, composed by [`Processor`]. `COPY`
/// never reaches `commit`; the processor places the final text on the
/// clipboard itself.
#[async_trait]
pub trait Destination: Send + Sync {
    /// Destination name for logs
    fn name(&self) -> &'static str;

    /// Metadata rules checked before any tree mutation
    fn validator(&self) -> MetadataValidator;

    /// The ordered stage subset this destination applies
    fn stages(&self) -> Vec<Stage>;

    /// Deliver the transformed document for `CREATE` or `PUBLISH`.
    ///
    /// `metadata` is the source document's front-matter, available even when
    /// the stage subset stripped it from the transformed text.
    async fn commit(
        &self,
        action: Action,
        doc: &Document,
        metadata: &Metadata,
    ) -> Result<CommitOutcome>;
}

/// Orchestrates validate → transform → dispatch for one destination.
pub struct Processor {
    config: PublishConfig,
    destination: Box<dyn Destination>,
    source: Arc<dyn DocumentSource>,
    notifier: Arc<dyn Notifier>,
    clipboard: Arc<dyn ClipboardSink>,
    preprocessor: Arc<dyn ImagePreprocessor>,
}

impl Processor {
    /// Create a processor over one destination and its host collaborators.
    pub fn new(
        config: PublishConfig,
        destination: Box<dyn Destination>,
        source: Arc<dyn DocumentSource>,
        notifier: Arc<dyn Notifier>,
        clipboard: Arc<dyn ClipboardSink>,
    ) -> Self {
        Self {
            config,
            destination,
            source,
            notifier,
            clipboard,
            preprocessor: Arc::new(NoopImagePreprocessor),
        }
    }

    /// Replace the image preprocessor run before text transformation.
    pub fn with_preprocessor(mut self, preprocessor: Arc<dyn ImagePreprocessor>) -> Self {
        self.preprocessor = preprocessor;
        self
    }

    /// Run one invocation to a terminal state.
    ///
    /// Validation failures and declined confirmations end in
    /// `Ok(ProcessorState::Rejected)` after notifying the user; parse and
    /// destination failures notify and return the error.
    pub async fn process(&self, action: Action) -> Result<ProcessorState> {
        let mut state = ProcessorState::Idle;
        state = self.transition(state, ProcessorState::Validating, action);

        let raw = self
            .source
            .read_active_document()
            .await
            .map_err(|e| self.fail(e))?;
        let raw = self
            .preprocessor
            .rewrite_images(raw)
            .await
            .map_err(|e| self.fail(e))?;

        let metadata = frontmatter::metadata(&raw);
        if let Err(e) = self.destination.validator().validate(&metadata) {
            tracing::warn!(destination = self.destination.name(), error = %e, "validation rejected");
            self.notifier.notify(&e.to_string());
            return Ok(ProcessorState::Rejected);
        }

        state = self.transition(state, ProcessorState::Transforming, action);

        let identity = self
            .source
            .active_document_identity()
            .map_err(|e| self.fail(e))?;
        let parsed = tree::parse(&raw).map_err(|e| self.fail(e))?;
        let doc = Document::new(identity.name, identity.path, parsed);
        let doc = apply_stages(doc, &self.destination.stages(), &self.config)
            .map_err(|e| self.fail(e))?;

        state = self.transition(state, ProcessorState::Dispatching, action);

        let terminal = match action {
            Action::Copy => {
                self.clipboard
                    .set_text(&doc.text())
                    .map_err(|e| self.fail(e))?;
                self.notifier.notify("Copied to clipboard");
                ProcessorState::Committed
            }
            Action::Create | Action::Publish => {
                match self.destination.commit(action, &doc, &metadata).await {
                    Ok(CommitOutcome::Committed(message)) => {
                        self.notifier.notify(&message);
                        ProcessorState::Committed
                    }
                    Ok(CommitOutcome::Cancelled(message)) => {
                        self.notifier.notify(&message);
                        ProcessorState::Rejected
                    }
                    Err(e) => return Err(self.fail(e)),
                }
            }
        };

        Ok(self.transition(state, terminal, action))
    }

    fn transition(
        &self,
        from: ProcessorState,
        to: ProcessorState,
        action: Action,
    ) -> ProcessorState {
        tracing::debug!(
            destination = self.destination.name(),
            %action,
            ?from,
            ?to,
            "processor transition"
        );
        to
    }

    fn fail(&self, error: Error) -> Error {
        self.notifier.notify(&error.to_string());
        error
    }
}
