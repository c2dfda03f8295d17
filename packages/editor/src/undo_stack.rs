//! # Undo/Redo Stack
//!
//! Tracks document history and enables undo/redo.
//!
//! ## Design
//!
//! - Documents share structure, so a history entry is simply the
//!   previous root; keeping one costs a pointer, not a deep copy
//! - Undo swaps the current root for the most recent entry and moves
//!   the current root to the redo stack
//! - New edits clear the redo stack
//! - The stack serializes as `{"undo": [...], "redo": [...]}` so a
//!   front-end can keep history between runs
//!
//! ## Example
//!
//! ```rust,ignore
//! let mut stack = UndoStack::new();
//! let next = event.apply(&doc);
//! stack.record(doc, Some("Set client"));
//! let doc = stack.undo(next).unwrap();
//! ```

use crate::document::Value;
use serde::{Deserialize, Serialize};

/// Default maximum number of undo levels
pub const DEFAULT_UNDO_LEVELS: usize = 100;

/// Document as it was before a step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub document: Value,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Undo/redo history for one editing session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UndoStack {
    /// Previous documents (most recent last)
    #[serde(rename = "undo", default)]
    undo_stack: Vec<Snapshot>,

    /// Undone documents (most recent last)
    #[serde(rename = "redo", default)]
    redo_stack: Vec<Snapshot>,

    /// Maximum number of undo levels (0 = unlimited)
    #[serde(skip, default = "default_levels")]
    max_levels: usize,
}

fn default_levels() -> usize {
    DEFAULT_UNDO_LEVELS
}

impl Default for UndoStack {
    fn default() -> Self {
        Self::new()
    }
}

impl UndoStack {
    /// Create a new undo stack with default max levels (100)
    pub fn new() -> Self {
        Self::with_max_levels(DEFAULT_UNDO_LEVELS)
    }

    pub fn with_max_levels(max_levels: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_levels,
        }
    }

    /// Record `previous` as the state before an edit
    pub fn record(&mut self, previous: Value, description: Option<&str>) {
        self.redo_stack.clear();
        self.undo_stack.push(Snapshot {
            document: previous,
            description: description.map(str::to_string),
        });

        if self.max_levels > 0 && self.undo_stack.len() > self.max_levels {
            self.undo_stack.remove(0);
        }
    }

    /// Step back; returns the document to install
    pub fn undo(&mut self, current: Value) -> Option<Value> {
        let snapshot = self.undo_stack.pop()?;
        self.redo_stack.push(Snapshot {
            document: current,
            description: snapshot.description.clone(),
        });
        Some(snapshot.document)
    }

    /// Step forward again; returns the document to install
    pub fn redo(&mut self, current: Value) -> Option<Value> {
        let snapshot = self.redo_stack.pop()?;
        self.undo_stack.push(Snapshot {
            document: current,
            description: snapshot.description.clone(),
        });
        Some(snapshot.document)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Description of the step `undo` would revert
    pub fn undo_description(&self) -> Option<&str> {
        self.undo_stack.last()?.description.as_deref()
    }

    /// Description of the step `redo` would re-apply
    pub fn redo_description(&self) -> Option<&str> {
        self.redo_stack.last()?.description.as_deref()
    }

    /// Forget all history
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}
