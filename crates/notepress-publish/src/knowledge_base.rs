//! Knowledge-base destination: documents keyed by slug, published into a
//! remote table of contents.

use crate::processor::{CommitOutcome, Destination};
use async_trait::async_trait;
use notepress_api::KnowledgeBaseApi;
use notepress_core::{
    Action, ConfirmGate, Document, Error, Metadata, MetadataValidator, PublishConfig, Result,
    slug_segment,
};
use notepress_transform::Stage;
use std::sync::Arc;

/// Stage order for the knowledge base. Its wire format forbids embedded
/// metadata, so the front-matter is stripped after the text rewrites.
const STAGES: [Stage; 4] = [
    Stage::TruncateFurtherReading,
    Stage::StripCallouts,
    Stage::RewriteLinks,
    Stage::StripFrontMatter,
];

/// Publishes to the remote knowledge-base service.
pub struct KnowledgeBaseDestination {
    config: PublishConfig,
    api: Arc<dyn KnowledgeBaseApi>,
    confirm: Arc<dyn ConfirmGate>,
}

impl KnowledgeBaseDestination {
    pub fn new(
        config: PublishConfig,
        api: Arc<dyn KnowledgeBaseApi>,
        confirm: Arc<dyn ConfirmGate>,
    ) -> Self {
        Self {
            config,
            api,
            confirm,
        }
    }

    fn slug<'a>(&self, metadata: &'a Metadata) -> Result<&'a str> {
        let path = metadata.get("path").map(String::as_str).unwrap_or("");
        slug_segment(path)
            .ok_or_else(|| Error::validation_error("slug 不能为空，请检查 path"))
    }

    /// Best-effort existence lookup: a failed or empty list means "does not
    /// exist yet", never a fatal error.
    async fn find_existing(&self, title: &str, slug: &str) -> Option<notepress_core::DraftRef> {
        let drafts = match self.api.list_drafts().await {
            Ok(drafts) => drafts,
            Err(e) => {
                tracing::warn!(error = %e, "draft lookup failed, assuming document does not exist");
                Vec::new()
            }
        };
        drafts
            .into_iter()
            .find(|d| d.slug.as_deref() == Some(slug) || d.title == title)
    }

    async fn create(&self, doc: &Document, metadata: &Metadata) -> Result<CommitOutcome> {
        let slug = self.slug(metadata)?;
        let body = doc.text();

        if let Some(existing) = self.find_existing(&doc.name, slug).await {
            let prompt = format!("【{}】已经存在，确定要更新吗？", doc.name);
            if !self.confirm.confirm(&prompt).await {
                return Ok(CommitOutcome::Cancelled("已取消更新".to_string()));
            }
            self.api.update_draft(&existing.id, &doc.name, &body).await?;
            return Ok(CommitOutcome::Committed("Updated successfully".to_string()));
        }

        self.api.create_draft(&doc.name, &body, slug).await?;
        Ok(CommitOutcome::Committed("Created successfully".to_string()))
    }

    async fn publish(&self, doc: &Document, metadata: &Metadata) -> Result<CommitOutcome> {
        let slug = self.slug(metadata)?;
        let draft = self.api.create_draft(&doc.name, &doc.text(), slug).await?;

        if let Some(parent) = &self.config.knowledge_base.toc_parent {
            self.api
                .append_to_table_of_contents(parent, &draft.id)
                .await?;
        }

        Ok(CommitOutcome::Committed("Published successfully".to_string()))
    }
}

#[async_trait]
impl Destination for KnowledgeBaseDestination {
    fn name(&self) -> &'static str {
        "knowledge-base"
    }

    fn validator(&self) -> MetadataValidator {
        MetadataValidator::new()
            .require_field("categories")
            .require_field("description")
            .require_field("path")
            .check_slug_segment()
    }

    fn stages(&self) -> Vec<Stage> {
        STAGES.to_vec()
    }

    async fn commit(
        &self,
        action: Action,
        doc: &Document,
        metadata: &Metadata,
    ) -> Result<CommitOutcome> {
        match action {
            Action::Create => self.create(doc, metadata).await,
            Action::Publish => self.publish(doc, metadata).await,
            Action::Copy => Err(Error::invalid_action(action.to_string())),
        }
    }
}
