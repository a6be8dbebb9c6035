use std::cell::{Ref, RefCell};
use std::rc::Rc;
use std::time::{Instant, SystemTime};

use super::history::{CommitDebouncer, HistoryController};
use crate::app::domain::document::Document;
use crate::app::domain::output::OutputSink;
use crate::app::domain::settings::EditorSettings;
use crate::app::infrastructure::clipboard::Clipboard;
use crate::app::infrastructure::error::Result;
use crate::app::services::sandbox::ExecutionSandbox;
use crate::app::services::share::share_url;
use crate::app::services::store::DocumentStore;

/// One editing session: the document, its history, the console and the sandbox.
///
/// Every user event (edit, run, undo, save, ...) goes through here and runs to
/// completion before the next one. The debounce deadline is serviced by the
/// host calling [`EditorSession::tick`].
pub struct EditorSession<S: DocumentStore> {
    document: Document,
    history: HistoryController,
    debouncer: CommitDebouncer,
    sandbox: ExecutionSandbox,
    output: Rc<RefCell<OutputSink>>,
    store: S,
    settings: EditorSettings,
    saved: bool,
    last_saved: Option<SystemTime>,
}

impl<S: DocumentStore> EditorSession<S> {
    /// Start a session from the stored document, or from the default program
    /// for the configured language.
    pub fn open(store: S, settings: EditorSettings) -> Result<Self> {
        let stored = if settings.restore_last_document {
            match store.load() {
                Ok(doc) => doc,
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to load stored document, starting fresh");
                    None
                }
            }
        } else {
            None
        };

        let (document, restored) = match stored {
            Some(doc) if !doc.text.is_empty() => (doc, true),
            Some(doc) => (Document::with_default_code(&doc.language), false),
            None => (Document::with_default_code(&settings.default_language), false),
        };
        let mut session = Self::with_document(document, store, settings)?;
        session.saved = restored;
        Ok(session)
    }

    /// Start a session on an explicit document (a file or a share link).
    pub fn with_document(document: Document, store: S, settings: EditorSettings) -> Result<Self> {
        let output = Rc::new(RefCell::new(OutputSink::new()));
        let sandbox = ExecutionSandbox::new(output.clone())?;
        Ok(Self {
            history: HistoryController::new(document.text.clone()),
            debouncer: CommitDebouncer::new(settings.history_debounce()),
            document,
            sandbox,
            output,
            store,
            settings,
            saved: false,
            last_saved: None,
        })
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn history(&self) -> &HistoryController {
        &self.history
    }

    pub fn output(&self) -> Ref<'_, OutputSink> {
        self.output.borrow()
    }

    pub fn settings(&self) -> &EditorSettings {
        &self.settings
    }

    pub fn file_name(&self) -> String {
        self.document.file_name()
    }

    pub fn has_pending_commit(&self) -> bool {
        self.debouncer.is_pending()
    }

    /// True when the text on screen is what the store holds.
    pub fn is_saved(&self) -> bool {
        self.saved
    }

    /// When `save` last succeeded in this session.
    pub fn last_saved(&self) -> Option<SystemTime> {
        self.last_saved
    }

    /// The editor reported new text.
    pub fn on_change(&mut self, text: impl Into<String>, now: Instant) {
        let text = text.into();
        self.debouncer.schedule(text.clone(), now);
        self.document.text = text;
        self.saved = false;
    }

    /// Commit the pending edit if its quiet period is over.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.debouncer.poll(now) {
            Some(text) => self.history.commit(text),
            None => false,
        }
    }

    fn flush_pending(&mut self) {
        if let Some(text) = self.debouncer.flush() {
            self.history.commit(text);
        }
    }

    pub fn undo(&mut self) -> &str {
        self.flush_pending();
        self.document.text = self.history.undo().to_string();
        self.saved = false;
        &self.document.text
    }

    pub fn redo(&mut self) -> &str {
        self.flush_pending();
        self.document.text = self.history.redo().to_string();
        self.saved = false;
        &self.document.text
    }

    pub fn run(&mut self) {
        self.sandbox.run(&self.document);
    }

    pub fn clear_output(&mut self) {
        self.output.borrow_mut().clear();
    }

    /// Persist the document and record it as a history snapshot.
    pub fn save(&mut self) -> bool {
        self.debouncer.cancel();
        self.history.commit(self.document.text.clone());
        match self.store.save(&self.document) {
            Ok(()) => {
                self.saved = true;
                self.last_saved = Some(SystemTime::now());
                self.output.borrow_mut().system("Code saved successfully");
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to save document");
                self.output
                    .borrow_mut()
                    .error(format!("Failed to save code: {}", e));
                false
            }
        }
    }

    /// Replace the document with the default program and start history over.
    pub fn new_file(&mut self) {
        self.debouncer.cancel();
        self.document = Document::with_default_code(&self.document.language);
        self.history.reset(self.document.text.clone());
        self.output.borrow_mut().clear();
        self.saved = false;
    }

    /// Switch language. Empty or untouched example text is swapped for the
    /// new language's example; anything the user wrote is kept.
    pub fn change_language(&mut self, language: &str) {
        let replace_text = self.document.text.is_empty() || self.document.is_default_code();
        self.document.language = language.to_string();
        self.saved = false;
        if replace_text {
            self.debouncer.cancel();
            self.document = Document::with_default_code(language);
            self.history.reset(self.document.text.clone());
        }
    }

    /// Copy a share link for the document to the clipboard.
    pub fn share(&mut self, clipboard: &mut dyn Clipboard) -> bool {
        let copied = share_url(&self.settings.share_base_url, &self.document)
            .and_then(|url| clipboard.set_text(url.as_str()));
        let mut output = self.output.borrow_mut();
        match copied {
            Ok(()) => {
                output.system("Shareable link copied to clipboard");
                true
            }
            Err(e) => {
                output.error(format!("Failed to copy link: {}", e));
                false
            }
        }
    }

    /// Copy the whole console to the clipboard.
    pub fn copy_output(&mut self, clipboard: &mut dyn Clipboard) -> bool {
        let text = self.output.borrow().copy_text();
        if text.is_empty() {
            return false;
        }
        match clipboard.set_text(&text) {
            Ok(()) => true,
            Err(e) => {
                self.output
                    .borrow_mut()
                    .error(format!("Failed to copy console output: {}", e));
                false
            }
        }
    }
}
