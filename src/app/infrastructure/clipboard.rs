use super::error::{AppError, Result};

/// Destination for the copy-all and share actions.
///
/// The real clipboard belongs to the host; the core only hands it text.
pub trait Clipboard {
    fn set_text(&mut self, text: &str) -> Result<()>;
}

/// In-process clipboard that keeps the last copied text.
///
/// Used by the terminal binary (which has no system clipboard) and by tests.
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    contents: Option<String>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> Option<&str> {
        self.contents.as_deref()
    }
}

impl Clipboard for MemoryClipboard {
    fn set_text(&mut self, text: &str) -> Result<()> {
        self.contents = Some(text.to_string());
        Ok(())
    }
}

/// Clipboard that always refuses; stands in for a host without clipboard access.
#[derive(Debug, Default)]
pub struct UnavailableClipboard;

impl Clipboard for UnavailableClipboard {
    fn set_text(&mut self, _text: &str) -> Result<()> {
        Err(AppError::Clipboard("clipboard is not available".to_string()))
    }
}
