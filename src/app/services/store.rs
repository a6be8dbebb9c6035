use std::cell::RefCell;
use std::fs;
use std::path::PathBuf;

use crate::app::domain::document::Document;
use crate::app::infrastructure::error::{AppError, Result};

/// Load/save contract for the last edited document.
pub trait DocumentStore {
    /// `Ok(None)` when nothing has been stored yet.
    fn load(&self) -> Result<Option<Document>>;
    fn save(&self, document: &Document) -> Result<()>;
}

/// Returns the document directory path: data_dir/scriptpad/
pub fn store_dir() -> PathBuf {
    let mut path = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("scriptpad");
    path
}

/// Stores the document as pretty JSON in a single file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The store in the platform data directory.
    pub fn default_location() -> Self {
        Self::new(store_dir().join("document.json"))
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

impl DocumentStore for JsonFileStore {
    fn load(&self) -> Result<Option<Document>> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let document: Document = serde_json::from_str(&contents)?;
        if document.language.trim().is_empty() {
            return Err(AppError::Store(format!(
                "{} has no language tag",
                self.path.display()
            )));
        }
        Ok(Some(document))
    }

    fn save(&self, document: &Document) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(document)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

/// Keeps the document in memory only.
#[derive(Debug, Default)]
pub struct MemoryStore {
    document: RefCell<Option<Document>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(document: Document) -> Self {
        Self {
            document: RefCell::new(Some(document)),
        }
    }
}

impl DocumentStore for MemoryStore {
    fn load(&self) -> Result<Option<Document>> {
        Ok(self.document.borrow().clone())
    }

    fn save(&self, document: &Document) -> Result<()> {
        *self.document.borrow_mut() = Some(document.clone());
        Ok(())
    }
}
