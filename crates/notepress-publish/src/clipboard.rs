//! System clipboard sink backed by `arboard`.

use notepress_core::{ClipboardSink, Error, Result};

/// Writes final text to the OS clipboard.
///
/// Opens a fresh clipboard handle per call, so the sink carries no state.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClipboard;

impl ClipboardSink for SystemClipboard {
    fn set_text(&self, text: &str) -> Result<()> {
        let mut clipboard = arboard::Clipboard::new()
            .map_err(|e| Error::clipboard_error(format!("clipboard unavailable: {}", e)))?;
        clipboard
            .set_text(text.to_string())
            .map_err(|e| Error::clipboard_error(format!("clipboard write failed: {}", e)))
    }
}
