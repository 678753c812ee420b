//! Knowledge-base REST client.
//!
//! Speaks the service's v2 dialect: documents live under a repository
//! ("book"), authentication is an opaque token in the `X-Auth-Token` header,
//! and table-of-contents placement is a separate mutation on the book.

use crate::{KnowledgeBaseApi, id_string};
use async_trait::async_trait;
use notepress_core::{DraftRef, Error, KnowledgeBaseConfig, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

const AUTH_HEADER: &str = "X-Auth-Token";

/// `reqwest`-backed [`KnowledgeBaseApi`] implementation.
#[derive(Debug, Clone)]
pub struct KnowledgeBaseClient {
    http: reqwest::Client,
    config: KnowledgeBaseConfig,
}

#[derive(Serialize)]
struct CreateDocBody<'a> {
    title: &'a str,
    slug: &'a str,
    public: u8,
    format: &'a str,
    body: &'a str,
}

#[derive(Serialize)]
struct UpdateDocBody<'a> {
    title: &'a str,
    body: &'a str,
}

#[derive(Serialize)]
struct AppendTocBody<'a> {
    action: &'a str,
    action_mode: &'a str,
    target_uuid: &'a str,
    doc_ids: Vec<&'a str>,
}

#[derive(Deserialize)]
struct DocEnvelope {
    data: DocData,
}

#[derive(Deserialize)]
struct DocListEnvelope {
    #[serde(default)]
    data: Vec<DocData>,
}

#[derive(Deserialize)]
struct DocData {
    id: serde_json::Value,
    #[serde(default)]
    title: String,
    #[serde(default)]
    slug: Option<String>,
}

impl KnowledgeBaseClient {
    /// Build a client from destination settings and the configured timeout.
    pub fn new(config: KnowledgeBaseConfig, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::api_error(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { http, config })
    }

    fn docs_url(&self) -> String {
        format!(
            "{}/api/v2/repos/{}/docs",
            self.config.base_url, self.config.book
        )
    }

    async fn check(&self, response: reqwest::Response, what: &str) -> Result<reqwest::Response> {
        let status = response.status();
        if !status.is_success() {
            return Err(Error::api_error(format!(
                "Knowledge base {} failed: HTTP {}",
                what, status
            )));
        }
        Ok(response)
    }
}

#[async_trait]
impl KnowledgeBaseApi for KnowledgeBaseClient {
    async fn create_draft(&self, title: &str, body: &str, slug: &str) -> Result<DraftRef> {
        let payload = CreateDocBody {
            title,
            slug,
            public: if self.config.public { 1 } else { 0 },
            format: "markdown",
            body,
        };
        let response = self
            .http
            .post(self.docs_url())
            .header(AUTH_HEADER, &self.config.token)
            .json(&payload)
            .send()
            .await
            .map_err(|e| Error::api_error(format!("Knowledge base create failed: {}", e)))?;
        let envelope: DocEnvelope = self
            .check(response, "create")
            .await?
            .json()
            .await
            .map_err(|e| Error::api_error(format!("Knowledge base create response: {}", e)))?;

        tracing::debug!(slug = %slug, "knowledge base document created");
        Ok(DraftRef {
            id: id_string(&envelope.data.id),
            title: title.to_string(),
            slug: Some(slug.to_string()),
        })
    }

    async fn update_draft(&self, id: &str, title: &str, body: &str) -> Result<()> {
        let url = format!("{}/{}", self.docs_url(), id);
        let response = self
            .http
            .put(url)
            .header(AUTH_HEADER, &self.config.token)
            .json(&UpdateDocBody { title, body })
            .send()
            .await
            .map_err(|e| Error::api_error(format!("Knowledge base update failed: {}", e)))?;
        self.check(response, "update").await?;
        Ok(())
    }

    async fn list_drafts(&self) -> Result<Vec<DraftRef>> {
        let response = self
            .http
            .get(self.docs_url())
            .header(AUTH_HEADER, &self.config.token)
            .send()
            .await
            .map_err(|e| Error::api_error(format!("Knowledge base list failed: {}", e)))?;
        let envelope: DocListEnvelope = self
            .check(response, "list")
            .await?
            .json()
            .await
            .map_err(|e| Error::api_error(format!("Knowledge base list response: {}", e)))?;

        Ok(envelope
            .data
            .into_iter()
            .map(|doc| DraftRef {
                id: id_string(&doc.id),
                title: doc.title,
                slug: doc.slug,
            })
            .collect())
    }

    async fn append_to_table_of_contents(&self, parent_uuid: &str, doc_id: &str) -> Result<()> {
        let url = format!(
            "{}/api/v2/repos/{}/toc",
            self.config.base_url, self.config.book
        );
        let payload = AppendTocBody {
            action: "appendNode",
            action_mode: "child",
            target_uuid: parent_uuid,
            doc_ids: vec![doc_id],
        };
        let response = self
            .http
            .put(url)
            .header(AUTH_HEADER, &self.config.token)
            .json(&payload)
            .send()
            .await
            .map_err(|e| Error::api_error(format!("Knowledge base TOC update failed: {}", e)))?;
        self.check(response, "TOC update").await?;

        tracing::debug!(parent = %parent_uuid, doc = %doc_id, "appended to table of contents");
        Ok(())
    }
}
