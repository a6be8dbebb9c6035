//! Console output model.
//!
//! The sink is the only thing the console view reads. Entries are appended in
//! call order and never reordered; `clear` throws everything away, including
//! the sequence counter.

use serde::Serialize;

/// Which console lane an entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum OutputKind {
    Info,
    Warning,
    Error,
    System,
}

/// One line of console output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputEntry {
    pub kind: OutputKind,
    pub text: String,
    pub sequence: u64,
}

#[derive(Debug, Default)]
pub struct OutputSink {
    entries: Vec<OutputEntry>,
    next_sequence: u64,
}

impl OutputSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry and return the sequence number it was given.
    pub fn append(&mut self, kind: OutputKind, text: impl Into<String>) -> u64 {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.entries.push(OutputEntry {
            kind,
            text: text.into(),
            sequence,
        });
        sequence
    }

    pub fn system(&mut self, text: impl Into<String>) -> u64 {
        self.append(OutputKind::System, format!("[system] {}", text.into()))
    }

    pub fn error(&mut self, text: impl Into<String>) -> u64 {
        self.append(OutputKind::Error, format!("[error] {}", text.into()))
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.next_sequence = 0;
    }

    pub fn all(&self) -> &[OutputEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entry texts joined by newlines, for the copy-all action.
    pub fn copy_text(&self) -> String {
        self.entries
            .iter()
            .map(|e| e.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}
