//! Community-platform destination: drafts keyed by title, published through
//! the platform's draft-to-article flow.

use crate::processor::{CommitOutcome, Destination};
use async_trait::async_trait;
use notepress_api::CommunityApi;
use notepress_core::{
    Action, ConfirmGate, Document, DraftRef, Error, Metadata, MetadataValidator, Result,
};
use notepress_transform::Stage;
use std::sync::Arc;

/// Stage order for the community platform. The origin notice goes in while
/// the front-matter (and with it the `path` metadata) is still present.
const STAGES: [Stage; 5] = [
    Stage::TruncateFurtherReading,
    Stage::StripCallouts,
    Stage::RewriteLinks,
    Stage::InjectOriginNotice,
    Stage::StripFrontMatter,
];

/// Publishes to the remote community platform.
pub struct CommunityDestination {
    api: Arc<dyn CommunityApi>,
    confirm: Arc<dyn ConfirmGate>,
}

impl CommunityDestination {
    pub fn new(api: Arc<dyn CommunityApi>, confirm: Arc<dyn ConfirmGate>) -> Self {
        Self { api, confirm }
    }

    /// Best-effort lookup by title; failure means "no draft yet".
    async fn find_existing(&self, title: &str) -> Option<DraftRef> {
        let drafts = match self.api.list_drafts().await {
            Ok(drafts) => drafts,
            Err(e) => {
                tracing::warn!(error = %e, "draft lookup failed, assuming draft does not exist");
                Vec::new()
            }
        };
        drafts.into_iter().find(|d| d.title == title)
    }

    async fn create(&self, doc: &Document) -> Result<CommitOutcome> {
        let body = doc.text();

        if let Some(existing) = self.find_existing(&doc.name).await {
            let prompt = format!("【{}】已经存在，确定要更新吗？", doc.name);
            if !self.confirm.confirm(&prompt).await {
                return Ok(CommitOutcome::Cancelled("已取消更新".to_string()));
            }
            self.api.update_draft(&existing.id, &doc.name, &body).await?;
            return Ok(CommitOutcome::Committed("Updated successfully".to_string()));
        }

        self.api.create_draft(&doc.name, &body).await?;
        Ok(CommitOutcome::Committed("Created successfully".to_string()))
    }

    async fn publish(&self, doc: &Document) -> Result<CommitOutcome> {
        // Publishing needs a real id; here the lookup is not best-effort.
        let drafts = self.api.list_drafts().await?;
        let draft = drafts
            .into_iter()
            .find(|d| d.title == doc.name)
            .ok_or_else(|| {
                Error::api_error(format!(
                    "No draft found for 【{}】; run CREATE first",
                    doc.name
                ))
            })?;

        self.api.publish(&draft.id).await?;
        Ok(CommitOutcome::Committed("Published successfully".to_string()))
    }
}

#[async_trait]
impl Destination for CommunityDestination {
    fn name(&self) -> &'static str {
        "community"
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
        _metadata: &Metadata,
    ) -> Result<CommitOutcome> {
        match action {
            Action::Create => self.create(doc).await,
            Action::Publish => self.publish(doc).await,
            Action::Copy => Err(Error::invalid_action(action.to_string())),
        }
    }
}
