use crate::error::ClipboardError;
use serde::Serialize;

/// Message shown after a successful copy.
pub const COPIED_MESSAGE: &str = "Sauce Copied 🍕";
pub const COPY_FAILED_MESSAGE: &str = "Copy failed";

/// Write-only access to the system clipboard.
pub trait Clipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// Clipboard that keeps everything written to it. Can be told to refuse writes.
#[derive(Debug, Default, Clone)]
pub struct MemoryClipboard {
    writes: Vec<String>,
    refuse: Option<String>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// A clipboard whose writes all fail with `reason`.
    pub fn refusing(reason: impl Into<String>) -> Self {
        MemoryClipboard {
            writes: Vec::new(),
            refuse: Some(reason.into()),
        }
    }

    pub fn contents(&self) -> Option<&str> {
        self.writes.last().map(String::as_str)
    }

    pub fn writes(&self) -> &[String] {
        &self.writes
    }
}

impl Clipboard for MemoryClipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        if let Some(reason) = &self.refuse {
            return Err(ClipboardError(reason.clone()));
        }
        self.writes.push(text.to_string());
        Ok(())
    }
}

/// Transient message near the click that triggered a copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub message: String,
    pub x: i32,
    pub y: i32,
    pub failed: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_clipboard_keeps_last_write() {
        let mut clipboard = MemoryClipboard::new();
        clipboard.write_text("a").unwrap();
        clipboard.write_text("b").unwrap();
        assert_eq!(clipboard.contents(), Some("b"));
        assert_eq!(clipboard.writes().len(), 2);
    }

    #[test]
    fn test_refusing_clipboard() {
        let mut clipboard = MemoryClipboard::refusing("denied");
        assert_eq!(
            clipboard.write_text("a"),
            Err(ClipboardError("denied".into()))
        );
        assert_eq!(clipboard.contents(), None);
    }
}
