//! Error types for the publishing system.
//!
//! All errors in the system are represented by the [`Error`] enum.
//! This ensures composable error handling across crates.

use std::io;
use std::path::PathBuf;
use thiserror::Error as ThisError;

/// The core error type for all publishing operations.
#[derive(ThisError, Debug)]
pub enum Error {
    /// File system error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// File not found
    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Invalid file path (outside target directory, malformed, etc.)
    #[error("Invalid file path: {reason}")]
    InvalidPath { reason: String },

    /// Path traversal attempt detected
    #[error("Path traversal detected: {path}")]
    PathTraversalAttempt { path: PathBuf },

    /// Parse error
    #[error("Parse error: {reason}")]
    ParseError { reason: String },

    /// Invalid configuration
    #[error("Configuration error: {reason}")]
    ConfigError { reason: String },

    /// Validation error
    #[error("Validation error: {reason}")]
    ValidationError { reason: String },

    /// Remote API call failed
    #[error("API error: {reason}")]
    ApiError { reason: String },

    /// Version control operation failed
    #[error("Git error: {reason}")]
    GitError { reason: String },

    /// Clipboard write failed
    #[error("Clipboard error: {reason}")]
    ClipboardError { reason: String },

    /// Action string not in the closed set
    #[error("Invalid action: {action}")]
    InvalidAction { action: String },

    /// Generic unclassified error
    #[error("Error: {0}")]
    Other(String),

    /// Wrapped error from other crates
    #[error("Wrapped error: {0}")]
    Wrapped(Box<dyn std::error::Error + Send + Sync>),
}

/// Convenient Result type alias
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create an IO error
    pub fn io(err: io::Error) -> Self {
        Error::Io(err)
    }

    /// Create a file not found error
    pub fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Error::FileNotFound { path: path.into() }
    }

    /// Create an invalid path error
    pub fn invalid_path(reason: impl Into<String>) -> Self {
        Error::InvalidPath {
            reason: reason.into(),
        }
    }

    /// Create a path traversal error
    pub fn path_traversal(path: impl Into<PathBuf>) -> Self {
        Error::PathTraversalAttempt { path: path.into() }
    }

    /// Create a parse error
    pub fn parse_error(reason: impl Into<String>) -> Self {
        Error::ParseError {
            reason: reason.into(),
        }
    }

    /// Create a configuration error
    pub fn config_error(reason: impl Into<String>) -> Self {
        Error::ConfigError {
            reason: reason.into(),
        }
    }

    /// Create a validation error
    pub fn validation_error(reason: impl Into<String>) -> Self {
        Error::ValidationError {
            reason: reason.into(),
        }
    }

    /// Create a validation error naming the empty metadata fields
    pub fn missing_metadata(fields: &[String]) -> Self {
        Error::ValidationError {
            reason: format!("请填写博客元信息：{}", fields.join("、")),
        }
    }

    /// Create an API error
    pub fn api_error(reason: impl Into<String>) -> Self {
        Error::ApiError {
            reason: reason.into(),
        }
    }

    /// Create a git error
    pub fn git_error(reason: impl Into<String>) -> Self {
        Error::GitError {
            reason: reason.into(),
        }
    }

    /// Create a clipboard error
    pub fn clipboard_error(reason: impl Into<String>) -> Self {
        Error::ClipboardError {
            reason: reason.into(),
        }
    }

    /// Create an invalid action error
    pub fn invalid_action(action: impl Into<String>) -> Self {
        Error::InvalidAction {
            action: action.into(),
        }
    }

    /// Create a generic error
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = Error::file_not_found("/path/to/file");
        assert!(err.to_string().contains("File not found"));

        let err = Error::invalid_action("DELETE");
        assert!(err.to_string().contains("Invalid action"));
    }

    #[test]
    fn test_missing_metadata_names_fields() {
        let err = Error::missing_metadata(&["path".to_string(), "description".to_string()]);
        let msg = err.to_string();
        assert!(msg.contains("path"));
        assert!(msg.contains("description"));
    }
}
