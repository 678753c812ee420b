//! # NotePress API
//!
//! HTTP clients for the two remote destinations: the knowledge-base service
//! and the developer-community platform.
//!
//! Destinations talk to the traits ([`KnowledgeBaseApi`], [`CommunityApi`]),
//! never to the clients directly, so the publish pipeline can be tested
//! against in-memory fakes. The bundled [`KnowledgeBaseClient`] and
//! [`CommunityClient`] speak the services' REST dialects over `reqwest` with
//! a per-request timeout; both take a configurable base URL so tests can point
//! them at a local stub server.
//!
//! Retry policy is deliberately absent: a failed call surfaces as an API
//! error and the user re-invokes the action.

mod community;
mod knowledge_base;

pub use community::CommunityClient;
pub use knowledge_base::KnowledgeBaseClient;

use async_trait::async_trait;
use notepress_core::{DraftRef, Result};

/// Remote knowledge-base API: draft CRUD plus table-of-contents placement.
///
/// Documents are keyed by slug; `list_drafts` is the best-effort existence
/// lookup the create path uses before deciding between create and update.
#[async_trait]
pub trait KnowledgeBaseApi: Send + Sync {
    /// Create a document and return its destination-assigned identity.
    async fn create_draft(&self, title: &str, body: &str, slug: &str) -> Result<DraftRef>;

    /// Replace an existing document's title and body.
    async fn update_draft(&self, id: &str, title: &str, body: &str) -> Result<()>;

    /// List existing documents. Callers treat failure as "nothing exists yet".
    async fn list_drafts(&self) -> Result<Vec<DraftRef>>;

    /// Append a document under a table-of-contents parent node.
    async fn append_to_table_of_contents(&self, parent_uuid: &str, doc_id: &str) -> Result<()>;
}

/// Remote community-platform API: drafts move from created to published.
#[async_trait]
pub trait CommunityApi: Send + Sync {
    /// Create a draft and return its destination-assigned identity.
    async fn create_draft(&self, title: &str, body: &str) -> Result<DraftRef>;

    /// Replace an existing draft's title and body.
    async fn update_draft(&self, id: &str, title: &str, body: &str) -> Result<()>;

    /// List existing drafts. Callers treat failure as "nothing exists yet".
    async fn list_drafts(&self) -> Result<Vec<DraftRef>>;

    /// Move a draft to its published form.
    async fn publish(&self, draft_id: &str) -> Result<()>;
}

/// Destination ids arrive as numbers from one service and strings from the
/// other; flatten both to strings for [`DraftRef`].
pub(crate) fn id_string(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_string_flattens_numbers_and_strings() {
        assert_eq!(id_string(&serde_json::json!(42)), "42");
        assert_eq!(id_string(&serde_json::json!("abc")), "abc");
    }
}
