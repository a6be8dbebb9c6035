//! Application layer - organized by Clean Architecture principles.
//!
//! # Structure
//!
//! - `domain/` - Core data structures (Document, OutputSink, Settings, languages)
//! - `controllers/` - Orchestration (HistoryController, EditorSession)
//! - `services/` - Business operations (sandbox, store, share links, highlighting)
//! - `infrastructure/` - External integrations (clipboard, error)

pub mod controllers;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-exports for convenient external access
pub use controllers::history::{CommitDebouncer, HistoryController};
pub use controllers::session::EditorSession;
pub use domain::{Document, EditorSettings, OutputEntry, OutputKind, OutputSink};
pub use infrastructure::error::{AppError, Result};
pub use services::sandbox::ExecutionSandbox;
pub use services::store::{DocumentStore, JsonFileStore, MemoryStore};
