//! Blog-repository destination: write into a local working tree, publish by
//! committing and pushing.

use crate::processor::{CommitOutcome, Destination};
use async_trait::async_trait;
use notepress_core::{
    Action, ConfirmGate, Document, Error, Metadata, MetadataValidator, PathValidator,
    PublishConfig, Result,
};
use notepress_transform::Stage;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::process::Command;

/// Stage order for the blog pipeline. Front-matter survives with the
/// platform metadata appended; the origin notice lands last so it sits after
/// the injected table of contents.
const STAGES: [Stage; 6] = [
    Stage::TruncateFurtherReading,
    Stage::StripCallouts,
    Stage::RewriteLinks,
    Stage::AppendPlatformMetadata,
    Stage::InsertToc,
    Stage::InjectOriginNotice,
];

/// Publishes into a local blog repository.
pub struct BlogDestination {
    config: PublishConfig,
    confirm: Arc<dyn ConfirmGate>,
}

impl BlogDestination {
    pub fn new(config: PublishConfig, confirm: Arc<dyn ConfirmGate>) -> Self {
        Self { config, confirm }
    }

    /// Target file for a document: `{directory}/{path}.md`, kept inside the
    /// repository.
    fn target_file(&self, path: &str) -> Result<PathBuf> {
        let relative = PathBuf::from(format!("{}.md", path));
        PathValidator::validate_path_in_repo(&self.config.blog.directory, &relative)
    }

    async fn create(&self, doc: &Document, metadata: &Metadata) -> Result<CommitOutcome> {
        let path = metadata.get("path").map(String::as_str).unwrap_or("");
        let target = self.target_file(path)?;

        let exists = target.exists();
        if exists {
            let prompt = format!("【{}】已经存在，确定要更新吗？", doc.name);
            if !self.confirm.confirm(&prompt).await {
                return Ok(CommitOutcome::Cancelled("已取消更新".to_string()));
            }
        }

        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&target, doc.text()).await?;
        tracing::info!(file = %target.display(), "blog post written");

        Ok(CommitOutcome::Committed(if exists {
            "Updated successfully".to_string()
        } else {
            "Created successfully".to_string()
        }))
    }

    async fn publish(&self, doc: &Document) -> Result<CommitOutcome> {
        let repo = GitRepo::new(&self.config.blog.directory);
        repo.add_all().await?;

        if !repo.has_changes().await? {
            return Ok(CommitOutcome::Committed("Nothing to publish".to_string()));
        }

        repo.commit(&format!("feat: 发布{}", doc.name)).await?;
        repo.push(&self.config.blog.remote, &self.config.blog.branch)
            .await?;

        Ok(CommitOutcome::Committed("Published successfully".to_string()))
    }
}

#[async_trait]
impl Destination for BlogDestination {
    fn name(&self) -> &'static str {
        "blog"
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
            Action::Publish => self.publish(doc).await,
            Action::Copy => Err(Error::invalid_action(action.to_string())),
        }
    }
}

/// Thin git wrapper over the blog working tree.
///
/// Everything runs through the `git` binary so the destination inherits the
/// user's existing remotes and credentials.
pub struct GitRepo {
    workdir: PathBuf,
}

impl GitRepo {
    pub fn new(workdir: impl AsRef<Path>) -> Self {
        Self {
            workdir: workdir.as_ref().to_path_buf(),
        }
    }

    /// Stage every change in the working tree.
    pub async fn add_all(&self) -> Result<()> {
        self.git(&["add", "."]).await
    }

    /// Whether staged or unstaged changes exist.
    pub async fn has_changes(&self) -> Result<bool> {
        let output = self.run(&["status", "--porcelain"]).await?;
        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(!stdout.trim().is_empty())
    }

    /// Commit staged changes with the given message.
    pub async fn commit(&self, message: &str) -> Result<()> {
        self.git(&["commit", "-m", message]).await
    }

    /// Push the configured branch to the configured remote.
    pub async fn push(&self, remote: &str, branch: &str) -> Result<()> {
        tracing::info!(remote = %remote, branch = %branch, "pushing blog repository");
        self.git(&["push", "-u", remote, branch]).await
    }

    async fn git(&self, args: &[&str]) -> Result<()> {
        let output = self.run(args).await?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::git_error(format!(
                "git {} failed: {}",
                args.first().unwrap_or(&""),
                stderr.trim()
            )));
        }
        Ok(())
    }

    async fn run(&self, args: &[&str]) -> Result<std::process::Output> {
        Command::new("git")
            .current_dir(&self.workdir)
            .args(args)
            .output()
            .await
            .map_err(|e| Error::git_error(format!("failed to run git: {}", e)))
    }
}
