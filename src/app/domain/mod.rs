//! Domain layer - core data structures and types.
//!
//! This module contains the fundamental domain models:
//! - Document and the language catalogue
//! - Console output entries and the sink
//! - Editor settings

pub mod document;
pub mod language;
pub mod output;
pub mod settings;

pub use document::Document;
pub use output::{OutputEntry, OutputKind, OutputSink};
pub use settings::EditorSettings;
