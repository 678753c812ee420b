//! Host collaborators for the terminal.
//!
//! The CLI stands in for the editor host: the "active document" is the file
//! named on the command line, notifications go to stdout, and the overwrite
//! gate is a y/N prompt.

use async_trait::async_trait;
use notepress_core::{ConfirmGate, DocumentIdentity, DocumentSource, Error, Notifier, Result};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Document source reading the note named on the command line.
pub struct FsDocumentSource {
    root: PathBuf,
    file: PathBuf,
}

impl FsDocumentSource {
    /// `root` is the workspace (vault) root the document path is reported
    /// relative to; `file` is the note itself.
    pub fn new(root: impl AsRef<Path>, file: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            file: file.as_ref().to_path_buf(),
        }
    }
}

#[async_trait]
impl DocumentSource for FsDocumentSource {
    async fn read_active_document(&self) -> Result<String> {
        if !self.file.exists() {
            return Err(Error::file_not_found(&self.file));
        }
        Ok(tokio::fs::read_to_string(&self.file).await?)
    }

    fn active_document_identity(&self) -> Result<DocumentIdentity> {
        let name = self
            .file
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| Error::invalid_path(format!("not a note file: {}", self.file.display())))?
            .to_string();

        let relative = self
            .file
            .strip_prefix(&self.root)
            .unwrap_or(&self.file)
            .to_string_lossy()
            .into_owned();

        Ok(DocumentIdentity {
            name,
            path: relative,
        })
    }
}

/// Prints every user-visible status message to stdout.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn notify(&self, message: &str) {
        println!("{}", message);
    }
}

/// y/N prompt on the controlling terminal. Anything other than an explicit
/// yes declines, so a piped or closed stdin can never overwrite a document.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalConfirmGate;

#[async_trait]
impl ConfirmGate for TerminalConfirmGate {
    async fn confirm(&self, message: &str) -> bool {
        print!("{} [y/N] ", message);
        let _ = std::io::stdout().flush();

        let mut answer = String::new();
        if std::io::stdin().read_line(&mut answer).is_err() {
            return false;
        }
        matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
    }
}
