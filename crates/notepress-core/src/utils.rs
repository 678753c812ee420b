//! Utility helpers shared across crates.

use crate::error::{Error, Result};
use std::path::{Component, Path, PathBuf};

/// Path validation helpers for destination writes.
pub struct PathValidator;

impl PathValidator {
    /// Ensure a relative path stays within a repository root (prevents
    /// directory traversal through metadata-supplied paths).
    pub fn validate_path_in_repo(repo_root: &Path, path: &Path) -> Result<PathBuf> {
        if path.is_absolute() {
            return Err(Error::invalid_path(format!(
                "expected a relative path, got {}",
                path.display()
            )));
        }

        let full_path = repo_root.join(path);

        // Canonicalize would require the path to exist. Check the normalized
        // form instead, so not-yet-written files still validate.
        if let Ok(canonical_full) = full_path.canonicalize() {
            let canonical_root = repo_root
                .canonicalize()
                .unwrap_or_else(|_| repo_root.to_path_buf());
            if !canonical_full.starts_with(&canonical_root) {
                return Err(Error::path_traversal(full_path));
            }
        } else {
            let mut normalized = PathBuf::new();
            for component in full_path.components() {
                match component {
                    Component::ParentDir => {
                        normalized.pop();
                    }
                    Component::Normal(name) => {
                        normalized.push(name);
                    }
                    Component::RootDir => {
                        normalized.push(component);
                    }
                    Component::CurDir => {}
                    Component::Prefix(p) => {
                        normalized.push(p.as_os_str());
                    }
                }
            }

            if !normalized.starts_with(repo_root) {
                return Err(Error::path_traversal(full_path));
            }
        }

        Ok(full_path)
    }
}
