//! Community-platform REST client.
//!
//! Drafts are created and updated through the content API with a session
//! token in the `cookie` header; publishing moves a draft id through the
//! article API. Markdown bodies travel in `mark_content` with the editor
//! type pinned to the markdown editor.

use crate::{CommunityApi, id_string};
use async_trait::async_trait;
use notepress_core::{CommunityConfig, DraftRef, Error, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Editor type the platform expects for markdown drafts.
const MARKDOWN_EDIT_TYPE: u8 = 10;

/// `reqwest`-backed [`CommunityApi`] implementation.
#[derive(Debug, Clone)]
pub struct CommunityClient {
    http: reqwest::Client,
    config: CommunityConfig,
}

#[derive(Serialize)]
struct DraftBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<&'a str>,
    title: &'a str,
    mark_content: &'a str,
    edit_type: u8,
    category_id: &'a str,
    tag_ids: &'a [String],
}

#[derive(Serialize)]
struct PublishBody<'a> {
    draft_id: &'a str,
}

#[derive(Deserialize)]
struct DraftEnvelope {
    data: DraftData,
}

#[derive(Deserialize)]
struct DraftListEnvelope {
    #[serde(default)]
    data: Vec<DraftData>,
}

#[derive(Deserialize)]
struct DraftData {
    id: serde_json::Value,
    #[serde(default)]
    title: String,
}

impl CommunityClient {
    /// Build a client from destination settings and the configured timeout.
    pub fn new(config: CommunityConfig, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::api_error(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { http, config })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
    }

    async fn post_json<T: Serialize + ?Sized>(
        &self,
        path: &str,
        payload: &T,
        what: &str,
    ) -> Result<reqwest::Response> {
        let response = self
            .http
            .post(self.url(path))
            .header("cookie", &self.config.token)
            .json(payload)
            .send()
            .await
            .map_err(|e| Error::api_error(format!("Community {} failed: {}", what, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::api_error(format!(
                "Community {} failed: HTTP {}",
                what, status
            )));
        }
        Ok(response)
    }
}

#[async_trait]
impl CommunityApi for CommunityClient {
    async fn create_draft(&self, title: &str, body: &str) -> Result<DraftRef> {
        let payload = DraftBody {
            id: None,
            title,
            mark_content: body,
            edit_type: MARKDOWN_EDIT_TYPE,
            category_id: &self.config.category_id,
            tag_ids: &self.config.tag_ids,
        };
        let envelope: DraftEnvelope = self
            .post_json("/content_api/v1/article_draft/create", &payload, "create")
            .await?
            .json()
            .await
            .map_err(|e| Error::api_error(format!("Community create response: {}", e)))?;

        tracing::debug!(title = %title, "community draft created");
        Ok(DraftRef {
            id: id_string(&envelope.data.id),
            title: title.to_string(),
            slug: None,
        })
    }

    async fn update_draft(&self, id: &str, title: &str, body: &str) -> Result<()> {
        let payload = DraftBody {
            id: Some(id),
            title,
            mark_content: body,
            edit_type: MARKDOWN_EDIT_TYPE,
            category_id: &self.config.category_id,
            tag_ids: &self.config.tag_ids,
        };
        self.post_json("/content_api/v1/article_draft/update", &payload, "update")
            .await?;
        Ok(())
    }

    async fn list_drafts(&self) -> Result<Vec<DraftRef>> {
        let envelope: DraftListEnvelope = self
            .post_json(
                "/content_api/v1/article_draft/query_list",
                &serde_json::json!({}),
                "list",
            )
            .await?
            .json()
            .await
            .map_err(|e| Error::api_error(format!("Community list response: {}", e)))?;

        Ok(envelope
            .data
            .into_iter()
            .map(|draft| DraftRef {
                id: id_string(&draft.id),
                title: draft.title,
                slug: None,
            })
            .collect())
    }

    async fn publish(&self, draft_id: &str) -> Result<()> {
        self.post_json(
            "/api/article/publish",
            &PublishBody { draft_id },
            "publish",
        )
        .await?;

        tracing::debug!(draft = %draft_id, "community draft published");
        Ok(())
    }
}
