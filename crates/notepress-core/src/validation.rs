//! Metadata validation for the publishing gate.
//!
//! Every destination validates the active document's front-matter before any
//! tree mutation or destination call. The rules are small: a set of required
//! keys that must be present and non-empty, and optionally a check that the
//! path's second segment is a lowercase-hyphenated slug.

use crate::error::{Error, Result};
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

/// Decoded front-matter: string keys to flattened string values.
pub type Metadata = HashMap<String, String>;

/// Lowercase-hyphenated slug: starts and ends with a letter, hyphens inside.
static SLUG_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z][a-z-]*[a-z]$").unwrap());

/// Extract the slug segment from a `path` metadata value.
///
/// The first segment is the category directory, the second is the post slug:
/// `tech/my-post` yields `my-post`. Paths without a second segment yield
/// `None`.
pub fn slug_segment(path: &str) -> Option<&str> {
    path.split('/').nth(1).filter(|s| !s.is_empty())
}

/// Whether a slug matches the lowercase-hyphenated pattern.
pub fn is_valid_slug(slug: &str) -> bool {
    SLUG_PATTERN.is_match(slug)
}

/// Validates required metadata fields and (optionally) the path slug.
#[derive(Debug, Clone, Default)]
pub struct MetadataValidator {
    required_fields: Vec<String>,
    check_slug: bool,
}

impl MetadataValidator {
    /// Create a validator with no rules
    pub fn new() -> Self {
        Self::default()
    }

    /// Require a field to be present and non-empty
    pub fn require_field(mut self, field: impl Into<String>) -> Self {
        self.required_fields.push(field.into());
        self
    }

    /// Also require the `path` value's second segment to be a valid slug
    pub fn check_slug_segment(mut self) -> Self {
        self.check_slug = true;
        self
    }

    /// Validate the metadata, stopping at the first failing rule.
    ///
    /// Missing fields are reported together, in the order they were required.
    pub fn validate(&self, metadata: &Metadata) -> Result<()> {
        let missing: Vec<String> = self
            .required_fields
            .iter()
            .filter(|f| metadata.get(f.as_str()).is_none_or(|v| v.is_empty()))
            .cloned()
            .collect();

        if !missing.is_empty() {
            return Err(Error::missing_metadata(&missing));
        }

        if self.check_slug {
            let path = metadata.get("path").map(String::as_str).unwrap_or("");
            let valid = slug_segment(path).is_some_and(is_valid_slug);
            if !valid {
                return Err(Error::validation_error(
                    "路径格式不正确，请以中横线分割：example-path",
                ));
            }
        }

        Ok(())
    }
}
