//! # Edit Session
//!
//! Owns the canonical document for one wizard session and is its only
//! writer. Every change goes through one of three entry points:
//!
//! - [`EditSession::apply_edit`]: structured edit via the mutator
//! - [`EditSession::apply_text`]: full replace from the text view
//! - [`EditSession::load`]: full replace from outside (ingest, store)
//!
//! The text view is resynced after every change except a successful
//! text apply, which leaves the user's buffer as typed.
//!
//! Undo and redo step through the session's [`UndoStack`]; a front-end
//! that outlives the session hands the stack back with
//! [`EditSession::with_history`].

use crate::document::Value;
use crate::errors::EditorError;
use crate::mutations::EditEvent;
use crate::path::Path;
use crate::text_sync::{SyncState, TextSync};
use crate::tree::{self, EditorNode};
use crate::undo_stack::UndoStack;

/// Single editing session over one document
#[derive(Debug)]
pub struct EditSession {
    /// Session identifier (also the store key)
    pub id: String,

    /// Increments on every change
    pub version: u64,

    document: Value,
    text: TextSync,
    history: UndoStack,
}

impl EditSession {
    pub fn new(id: impl Into<String>, document: Value) -> Self {
        let text = TextSync::new(&document);
        Self {
            id: id.into(),
            version: 0,
            document,
            text,
            history: UndoStack::new(),
        }
    }

    /// Resume with history kept from an earlier session
    pub fn with_history(mut self, history: UndoStack) -> Self {
        self.history = history;
        self
    }

    pub fn document(&self) -> &Value {
        &self.document
    }

    pub fn history(&self) -> &UndoStack {
        &self.history
    }

    /// Editor tree for the current document
    pub fn render(&self) -> EditorNode {
        tree::render(&self.document, &Path::root())
    }

    pub fn text(&self) -> &TextSync {
        &self.text
    }

    /// Apply a structured edit; returns the new version
    pub fn apply_edit(&mut self, event: EditEvent) -> u64 {
        tracing::debug!(path = %event.path, "Applying edit");
        let next = event.apply(&self.document);
        let description = format!("Edit {}", event.path);
        self.install(next, Some(&description));
        self.text.resync(&self.document);
        self.version
    }

    /// Replace the document from outside; history starts over
    pub fn load(&mut self, document: Value) -> u64 {
        self.document = document;
        self.version += 1;
        self.history.clear();
        self.text.resync(&self.document);
        self.version
    }

    /// User typed into the text view
    pub fn edit_text(&mut self, text: impl Into<String>) {
        self.text.edit_text(text);
    }

    /// Parse the text view and make it the document. On failure the
    /// document is untouched and the text view reports the error.
    pub fn apply_text(&mut self) -> Result<u64, EditorError> {
        let next = self.text.apply()?;
        self.install(next, Some("Apply text"));
        Ok(self.version)
    }

    pub fn text_state(&self) -> SyncState {
        self.text.state()
    }

    pub fn undo(&mut self) -> bool {
        let current = self.document.clone();
        match self.history.undo(current) {
            Some(previous) => {
                self.replace_silently(previous);
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        let current = self.document.clone();
        match self.history.redo(current) {
            Some(next) => {
                self.replace_silently(next);
                true
            }
            None => false,
        }
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// What `undo` would revert, e.g. `Edit sites[0].name`
    pub fn undo_description(&self) -> Option<&str> {
        self.history.undo_description()
    }

    pub fn redo_description(&self) -> Option<&str> {
        self.history.redo_description()
    }

    fn install(&mut self, next: Value, description: Option<&str>) {
        let previous = std::mem::replace(&mut self.document, next);
        self.history.record(previous, description);
        self.version += 1;
    }

    /// History navigation: no new history entry, text follows
    fn replace_silently(&mut self, document: Value) {
        self.document = document;
        self.version += 1;
        self.text.resync(&self.document);
    }
}
