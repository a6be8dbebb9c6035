use serde::{Deserialize, Serialize};

use super::language;

/// The text being edited together with its language tag.
///
/// A plain value: the session replaces it wholesale on undo/redo and load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub text: String,
    pub language: String,
}

impl Document {
    pub fn new(text: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            language: language.into(),
        }
    }

    /// A document holding the example program for `language`.
    pub fn with_default_code(language: &str) -> Self {
        Self::new(language::default_code(language), language)
    }

    pub fn is_executable(&self) -> bool {
        language::is_executable(&self.language)
    }

    /// True when the text is still the untouched example for its language.
    pub fn is_default_code(&self) -> bool {
        self.text == language::default_code(&self.language)
    }

    /// `untitled.<ext>` for the document's language.
    pub fn file_name(&self) -> String {
        format!("untitled.{}", language::file_extension(&self.language))
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::with_default_code(language::DEFAULT_LANGUAGE)
    }
}
