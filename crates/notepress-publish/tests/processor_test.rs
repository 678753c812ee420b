//! End-to-end pipeline tests over in-memory host and API fakes.

use async_trait::async_trait;
use notepress_api::{CommunityApi, KnowledgeBaseApi};
use notepress_core::{
    Action, ClipboardSink, ConfirmGate, DocumentIdentity, DocumentSource, DraftRef, Notifier,
    PublishConfig, Result,
};
use notepress_publish::{
    BlogDestination, CommunityDestination, KnowledgeBaseDestination, Processor, ProcessorState,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

const NOTE: &str = "---\npath: tech/my-post\ncategories: x\ndescription: y\n---\n\n# Title\n\ncontent\n";

struct FakeSource {
    name: String,
    path: String,
    text: String,
}

impl FakeSource {
    fn new(text: &str) -> Arc<Self> {
        Arc::new(Self {
            name: "My Post".to_string(),
            path: "posts/My Post.md".to_string(),
            text: text.to_string(),
        })
    }
}

#[async_trait]
impl DocumentSource for FakeSource {
    async fn read_active_document(&self) -> Result<String> {
        Ok(self.text.clone())
    }

    fn active_document_identity(&self) -> Result<DocumentIdentity> {
        Ok(DocumentIdentity {
            name: self.name.clone(),
            path: self.path.clone(),
        })
    }
}

#[derive(Default)]
struct RecordingNotifier {
    messages: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    fn contains(&self, needle: &str) -> bool {
        self.messages
            .lock()
            .unwrap()
            .iter()
            .any(|m| m.contains(needle))
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, message: &str) {
        self.messages.lock().unwrap().push(message.to_string());
    }
}

struct FakeConfirm {
    answer: bool,
    asked: AtomicBool,
}

impl FakeConfirm {
    fn new(answer: bool) -> Arc<Self> {
        Arc::new(Self {
            answer,
            asked: AtomicBool::new(false),
        })
    }

    fn was_asked(&self) -> bool {
        self.asked.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ConfirmGate for FakeConfirm {
    async fn confirm(&self, _message: &str) -> bool {
        self.asked.store(true, Ordering::SeqCst);
        self.answer
    }
}

#[derive(Default)]
struct FakeClipboard {
    text: Mutex<Option<String>>,
}

impl ClipboardSink for FakeClipboard {
    fn set_text(&self, text: &str) -> Result<()> {
        *self.text.lock().unwrap() = Some(text.to_string());
        Ok(())
    }
}

#[derive(Default)]
struct FakeCommunity {
    existing: Vec<DraftRef>,
    created: Mutex<Vec<(String, String)>>,
    updated: Mutex<Vec<String>>,
    published: Mutex<Vec<String>>,
}

#[async_trait]
impl CommunityApi for FakeCommunity {
    async fn create_draft(&self, title: &str, body: &str) -> Result<DraftRef> {
        self.created
            .lock()
            .unwrap()
            .push((title.to_string(), body.to_string()));
        Ok(DraftRef {
            id: "d-1".to_string(),
            title: title.to_string(),
            slug: None,
        })
    }

    async fn update_draft(&self, id: &str, _title: &str, _body: &str) -> Result<()> {
        self.updated.lock().unwrap().push(id.to_string());
        Ok(())
    }

    async fn list_drafts(&self) -> Result<Vec<DraftRef>> {
        Ok(self.existing.clone())
    }

    async fn publish(&self, draft_id: &str) -> Result<()> {
        self.published.lock().unwrap().push(draft_id.to_string());
        Ok(())
    }
}

#[derive(Default)]
struct FakeKnowledgeBase {
    created: Mutex<Vec<(String, String, String)>>,
    toc_appends: Mutex<Vec<(String, String)>>,
}

#[async_trait]
impl KnowledgeBaseApi for FakeKnowledgeBase {
    async fn create_draft(&self, title: &str, body: &str, slug: &str) -> Result<DraftRef> {
        self.created.lock().unwrap().push((
            title.to_string(),
            body.to_string(),
            slug.to_string(),
        ));
        Ok(DraftRef {
            id: "101".to_string(),
            title: title.to_string(),
            slug: Some(slug.to_string()),
        })
    }

    async fn update_draft(&self, _id: &str, _title: &str, _body: &str) -> Result<()> {
        Ok(())
    }

    async fn list_drafts(&self) -> Result<Vec<DraftRef>> {
        Ok(Vec::new())
    }

    async fn append_to_table_of_contents(&self, parent_uuid: &str, doc_id: &str) -> Result<()> {
        self.toc_appends
            .lock()
            .unwrap()
            .push((parent_uuid.to_string(), doc_id.to_string()));
        Ok(())
    }
}

fn blog_config(directory: &std::path::Path) -> PublishConfig {
    let mut config = PublishConfig::default();
    config.blog.directory = directory.to_path_buf();
    config
}

#[tokio::test]
async fn test_blog_create_writes_transformed_file() {
    let temp = TempDir::new().unwrap();
    let config = blog_config(temp.path());
    let confirm = FakeConfirm::new(true);
    let notifier = Arc::new(RecordingNotifier::default());

    let processor = Processor::new(
        config.clone(),
        Box::new(BlogDestination::new(config, confirm.clone())),
        FakeSource::new(NOTE),
        notifier.clone(),
        Arc::new(FakeClipboard::default()),
    );

    let state = processor.process(Action::Create).await.unwrap();
    assert_eq!(state, ProcessorState::Committed);

    // First-time create: no confirmation dialog.
    assert!(!confirm.was_asked());
    assert!(notifier.contains("Created successfully"));

    let written = std::fs::read_to_string(temp.path().join("tech/my-post.md")).unwrap();
    assert!(written.starts_with("---\npath: tech/my-post"));
    assert!(written.contains("title: My Post"));
    assert!(written.contains("obsidian_url: obsidian://open?vault=content"));
    assert!(written.contains("## 目录"));
    assert!(written.contains("点击链接查看"));
    assert!(written.contains("# Title"));
}

#[tokio::test]
async fn test_blog_create_conflict_cancelled_leaves_file_untouched() {
    let temp = TempDir::new().unwrap();
    std::fs::create_dir_all(temp.path().join("tech")).unwrap();
    std::fs::write(temp.path().join("tech/my-post.md"), "old content\n").unwrap();

    let config = blog_config(temp.path());
    let confirm = FakeConfirm::new(false);
    let notifier = Arc::new(RecordingNotifier::default());

    let processor = Processor::new(
        config.clone(),
        Box::new(BlogDestination::new(config, confirm.clone())),
        FakeSource::new(NOTE),
        notifier.clone(),
        Arc::new(FakeClipboard::default()),
    );

    let state = processor.process(Action::Create).await.unwrap();
    assert_eq!(state, ProcessorState::Rejected);
    assert!(confirm.was_asked());
    assert!(notifier.contains("已取消更新"));

    let untouched = std::fs::read_to_string(temp.path().join("tech/my-post.md")).unwrap();
    assert_eq!(untouched, "old content\n");
}

#[tokio::test]
async fn test_validation_gate_halts_before_any_work() {
    let temp = TempDir::new().unwrap();
    let note_missing_description = "---\npath: tech/my-post\ncategories: x\n---\n\n# Title\n";

    let config = blog_config(temp.path());
    let confirm = FakeConfirm::new(true);
    let notifier = Arc::new(RecordingNotifier::default());

    let processor = Processor::new(
        config.clone(),
        Box::new(BlogDestination::new(config, confirm.clone())),
        FakeSource::new(note_missing_description),
        notifier.clone(),
        Arc::new(FakeClipboard::default()),
    );

    let state = processor.process(Action::Create).await.unwrap();
    assert_eq!(state, ProcessorState::Rejected);
    assert!(notifier.contains("description"));
    assert!(!confirm.was_asked());
    assert!(!temp.path().join("tech").exists());
}

#[tokio::test]
async fn test_bad_slug_rejected() {
    let temp = TempDir::new().unwrap();
    let note = "---\npath: tech/My_Post\ncategories: x\ndescription: y\n---\n\n# Title\n";

    let config = blog_config(temp.path());
    let notifier = Arc::new(RecordingNotifier::default());
    let processor = Processor::new(
        config.clone(),
        Box::new(BlogDestination::new(config, FakeConfirm::new(true))),
        FakeSource::new(note),
        notifier.clone(),
        Arc::new(FakeClipboard::default()),
    );

    let state = processor.process(Action::Create).await.unwrap();
    assert_eq!(state, ProcessorState::Rejected);
    assert!(notifier.contains("路径格式不正确"));
}

#[tokio::test]
async fn test_copy_places_final_text_on_clipboard() {
    let clipboard = Arc::new(FakeClipboard::default());
    let notifier = Arc::new(RecordingNotifier::default());
    let api = Arc::new(FakeCommunity::default());
    let config = PublishConfig::default();

    let processor = Processor::new(
        config,
        Box::new(CommunityDestination::new(api.clone(), FakeConfirm::new(true))),
        FakeSource::new(NOTE),
        notifier.clone(),
        clipboard.clone(),
    );

    let state = processor.process(Action::Copy).await.unwrap();
    assert_eq!(state, ProcessorState::Committed);
    assert!(notifier.contains("Copied to clipboard"));

    let copied = clipboard.text.lock().unwrap().clone().unwrap();
    // Community pipeline strips the front-matter before dispatch.
    assert!(!copied.contains("path: tech/my-post"));
    assert!(copied.contains("# Title"));
    // No destination round-trip for COPY.
    assert!(api.created.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_community_create_when_no_draft_exists() {
    let api = Arc::new(FakeCommunity::default());
    let notifier = Arc::new(RecordingNotifier::default());
    let confirm = FakeConfirm::new(true);

    let processor = Processor::new(
        PublishConfig::default(),
        Box::new(CommunityDestination::new(api.clone(), confirm.clone())),
        FakeSource::new(NOTE),
        notifier.clone(),
        Arc::new(FakeClipboard::default()),
    );

    let state = processor.process(Action::Create).await.unwrap();
    assert_eq!(state, ProcessorState::Committed);
    assert!(!confirm.was_asked());
    assert!(notifier.contains("Created successfully"));

    let created = api.created.lock().unwrap();
    assert_eq!(created.len(), 1);
    assert_eq!(created[0].0, "My Post");
    assert!(!created[0].1.contains("path: tech/my-post"));
    assert!(created[0].1.contains("点击链接查看"));
}

#[tokio::test]
async fn test_community_conflict_cancel_issues_no_update() {
    let api = Arc::new(FakeCommunity {
        existing: vec![DraftRef {
            id: "d-9".to_string(),
            title: "My Post".to_string(),
            slug: None,
        }],
        ..Default::default()
    });
    let confirm = FakeConfirm::new(false);
    let notifier = Arc::new(RecordingNotifier::default());

    let processor = Processor::new(
        PublishConfig::default(),
        Box::new(CommunityDestination::new(api.clone(), confirm.clone())),
        FakeSource::new(NOTE),
        notifier.clone(),
        Arc::new(FakeClipboard::default()),
    );

    let state = processor.process(Action::Create).await.unwrap();
    assert_eq!(state, ProcessorState::Rejected);
    assert!(confirm.was_asked());
    assert!(api.updated.lock().unwrap().is_empty());
    assert!(api.created.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_community_conflict_confirmed_updates_existing_draft() {
    let api = Arc::new(FakeCommunity {
        existing: vec![DraftRef {
            id: "d-9".to_string(),
            title: "My Post".to_string(),
            slug: None,
        }],
        ..Default::default()
    });
    let notifier = Arc::new(RecordingNotifier::default());

    let processor = Processor::new(
        PublishConfig::default(),
        Box::new(CommunityDestination::new(api.clone(), FakeConfirm::new(true))),
        FakeSource::new(NOTE),
        notifier.clone(),
        Arc::new(FakeClipboard::default()),
    );

    let state = processor.process(Action::Create).await.unwrap();
    assert_eq!(state, ProcessorState::Committed);
    assert_eq!(api.updated.lock().unwrap().as_slice(), ["d-9"]);
    assert!(notifier.contains("Updated successfully"));
}

#[tokio::test]
async fn test_knowledge_base_publish_appends_to_toc() {
    let api = Arc::new(FakeKnowledgeBase::default());
    let notifier = Arc::new(RecordingNotifier::default());
    let mut config = PublishConfig::default();
    config.knowledge_base.toc_parent = Some("uuid-42".to_string());

    let processor = Processor::new(
        config.clone(),
        Box::new(KnowledgeBaseDestination::new(
            config,
            api.clone(),
            FakeConfirm::new(true),
        )),
        FakeSource::new(NOTE),
        notifier.clone(),
        Arc::new(FakeClipboard::default()),
    );

    let state = processor.process(Action::Publish).await.unwrap();
    assert_eq!(state, ProcessorState::Committed);
    assert!(notifier.contains("Published successfully"));

    let created = api.created.lock().unwrap();
    assert_eq!(created.len(), 1);
    let (title, body, slug) = &created[0];
    assert_eq!(title, "My Post");
    assert_eq!(slug, "my-post");
    // Knowledge-base wire format forbids embedded metadata.
    assert!(!body.contains("---"));

    assert_eq!(
        api.toc_appends.lock().unwrap().as_slice(),
        [("uuid-42".to_string(), "101".to_string())]
    );
}
