//! # LoE Editor
//!
//! Document model and editing engine for the LoE assistant.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ document: immutable JSON-like Value         │
//! │  - structural sharing between versions      │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ mutations: path-addressed set               │
//! │ tree: Value → widget tree → EditEvent       │
//! │ text_sync: Value ⇄ editable JSON text       │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ session: single writer, undo/redo           │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Documents are values**: an edit produces a new root, the old one
//!    is never touched
//! 2. **Paths are explicit**: every edit names the full path from the root
//! 3. **One writer**: only [`EditSession`] installs a new document
//! 4. **Text is a view**: the text buffer reaches the document only
//!    through an explicit apply
//!
//! ## Usage
//!
//! ```rust,ignore
//! use loe_editor::{default_document, EditSession, NodeRef};
//!
//! let mut session = EditSession::new("rack_stack_schema", default_document("rack_stack"));
//!
//! let tree = session.render();
//! if let Some(NodeRef::Items(sites)) = tree.find(&"sites".parse()?) {
//!     session.apply_edit(sites.append());
//! }
//!
//! session.edit_text(r#"{"client": "Acme"}"#);
//! session.apply_text()?;
//! ```

mod defaults;
mod document;
mod errors;
mod mutations;
mod path;
mod session;
mod shape;
mod text_sync;
mod tree;
mod undo_stack;

pub use defaults::{default_document, DEFAULT_LOE_TYPE};
pub use document::{Map, Value};
pub use errors::{EditorError, TextDiagnostic};
pub use mutations::{get, set, EditEvent, MAX_INDEX_PADDING};
pub use path::{Path, PathKey};
pub use session::EditSession;
pub use shape::{classify, is_multiline, label, Shape, MULTILINE_KEY_HINTS, MULTILINE_THRESHOLD};
pub use text_sync::{SyncState, TextSync};
pub use tree::{
    render, EditorNode, FieldNode, ItemNode, ItemsNode, LinesNode, NodeRef, ObjectNode, Widget,
    FALLBACK_ITEM_KEYS,
};
pub use undo_stack::{Snapshot, UndoStack, DEFAULT_UNDO_LEVELS};
