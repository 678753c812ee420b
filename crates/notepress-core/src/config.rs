//! Configuration types for the publishing system.
//!
//! One [`PublishConfig`] covers every destination. It is loaded once at
//! startup, merged over defaults, treated as read-only for the length of a
//! `process()` call, and saved back atomically.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Site identity used when building origin links.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Base URL of the published blog, no trailing slash
    pub base_url: String,
    /// Feed URL offered in the origin notice
    pub feed_url: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: "https://blog.songxingguo.com".to_string(),
            feed_url: "https://blog.songxingguo.com/atom.xml".to_string(),
        }
    }
}

/// Blog repository destination settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BlogConfig {
    /// Working tree the rendered posts are written into
    pub directory: PathBuf,
    /// Git remote pushed to on publish
    pub remote: String,
    /// Branch pushed to on publish
    pub branch: String,
}

impl Default for BlogConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::new(),
            remote: "origin".to_string(),
            branch: "main".to_string(),
        }
    }
}

/// Knowledge-base destination settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KnowledgeBaseConfig {
    /// API origin, override for self-hosted deployments or tests
    pub base_url: String,
    /// Opaque bearer token sent as `X-Auth-Token`
    pub token: String,
    /// Repository (book) the documents belong to
    pub book: String,
    /// Whether created documents are publicly visible
    pub public: bool,
    /// Table-of-contents node new documents are appended under
    pub toc_parent: Option<String>,
}

impl Default for KnowledgeBaseConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.yuque.com".to_string(),
            token: String::new(),
            book: String::new(),
            public: true,
            toc_parent: None,
        }
    }
}

/// Community-platform destination settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CommunityConfig {
    /// API origin, override for tests
    pub base_url: String,
    /// Opaque session token sent as the `cookie` header
    pub token: String,
    /// Category assigned to created drafts
    pub category_id: String,
    /// Tags assigned to created drafts
    pub tag_ids: Vec<String>,
}

impl Default for CommunityConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.juejin.cn".to_string(),
            token: String::new(),
            category_id: "0".to_string(),
            tag_ids: Vec::new(),
        }
    }
}

/// Global configuration for the publishing pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PublishConfig {
    /// Workspace (vault) name used in host-open URLs
    pub vault: String,
    /// Directory attachments resolve against, relative to the workspace root
    pub attachment_location: String,
    /// Site identity for origin links
    pub site: SiteConfig,
    /// Blog repository destination
    pub blog: BlogConfig,
    /// Knowledge-base destination
    pub knowledge_base: KnowledgeBaseConfig,
    /// Community-platform destination
    pub community: CommunityConfig,
    /// Per-request timeout for remote calls, in seconds
    pub request_timeout_secs: u64,
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            vault: "content".to_string(),
            attachment_location: ".".to_string(),
            site: SiteConfig::default(),
            blog: BlogConfig::default(),
            knowledge_base: KnowledgeBaseConfig::default(),
            community: CommunityConfig::default(),
            request_timeout_secs: 30,
        }
    }
}

impl PublishConfig {
    /// Create new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.vault.is_empty() {
            return Err(Error::config_error("Vault name cannot be empty"));
        }

        if self.attachment_location.is_empty() {
            return Err(Error::config_error(
                "Attachment location cannot be empty (use \".\" for the workspace root)",
            ));
        }

        for (label, url) in [
            ("site.base_url", &self.site.base_url),
            ("site.feed_url", &self.site.feed_url),
            ("knowledge_base.base_url", &self.knowledge_base.base_url),
            ("community.base_url", &self.community.base_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(Error::config_error(format!(
                    "{} must be an absolute http(s) URL: {}",
                    label, url
                )));
            }
        }

        if self.request_timeout_secs == 0 {
            return Err(Error::config_error("Request timeout must be positive"));
        }

        Ok(())
    }

    /// Load configuration from a YAML file, falling back to defaults when the
    /// file does not exist. Unknown keys are ignored; missing keys take their
    /// default values.
    pub async fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("config file {} not found, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            Error::config_error(format!(
                "Failed to load config from {}: {}",
                path.display(),
                e
            ))
        })?;

        let config: PublishConfig = serde_yaml::from_str(&content)
            .map_err(|e| Error::config_error(format!("Invalid configuration: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a YAML file.
    ///
    /// Writes to a temporary sibling first and renames over the target, so a
    /// crash mid-write never leaves a torn config behind.
    pub async fn save_to_file(&self, path: &Path) -> Result<()> {
        let yaml = serde_yaml::to_string(self)
            .map_err(|e| Error::config_error(format!("Failed to serialize config: {}", e)))?;

        let tmp = path.with_extension("yaml.tmp");
        tokio::fs::write(&tmp, yaml).await.map_err(|e| {
            Error::config_error(format!("Failed to write {}: {}", tmp.display(), e))
        })?;
        tokio::fs::rename(&tmp, path).await.map_err(|e| {
            Error::config_error(format!(
                "Failed to save config to {}: {}",
                path.display(),
                e
            ))
        })?;

        log::debug!("config saved to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_validate() {
        let config = PublishConfig::new();
        assert!(config.validate().is_ok());
        assert_eq!(config.vault, "content");
        assert_eq!(config.attachment_location, ".");
        assert_eq!(config.blog.remote, "origin");
        assert_eq!(config.blog.branch, "main");
        assert_eq!(config.community.category_id, "0");
    }

    #[test]
    fn test_rejects_relative_urls() {
        let mut config = PublishConfig::new();
        config.site.base_url = "blog.example.com".to_string();
        assert!(config.validate().is_err());
    }

    #[tokio::test]
    async fn test_save_and_load_round_trip() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("notepress.yaml");

        let mut config = PublishConfig::new();
        config.blog.directory = temp.path().join("blog");
        config.knowledge_base.token = "secret".to_string();
        config.save_to_file(&path).await.unwrap();

        let loaded = PublishConfig::load_from_file(&path).await.unwrap();
        assert_eq!(loaded.blog.directory, temp.path().join("blog"));
        assert_eq!(loaded.knowledge_base.token, "secret");
        assert_eq!(loaded.vault, "content");
    }

    #[tokio::test]
    async fn test_missing_file_yields_defaults() {
        let temp = TempDir::new().unwrap();
        let loaded = PublishConfig::load_from_file(&temp.path().join("absent.yaml"))
            .await
            .unwrap();
        assert_eq!(loaded.site.base_url, "https://blog.songxingguo.com");
    }

    #[tokio::test]
    async fn test_partial_file_merges_over_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("notepress.yaml");
        tokio::fs::write(&path, "vault: notes\nblog:\n  directory: /tmp/blog\n")
            .await
            .unwrap();

        let loaded = PublishConfig::load_from_file(&path).await.unwrap();
        assert_eq!(loaded.vault, "notes");
        assert_eq!(loaded.blog.directory, PathBuf::from("/tmp/blog"));
        assert_eq!(loaded.blog.remote, "origin");
        assert_eq!(loaded.community.base_url, "https://api.juejin.cn");
    }
}
