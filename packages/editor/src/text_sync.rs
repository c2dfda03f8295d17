//! # Text View Synchronisation
//!
//! Keeps a serialized-text buffer consistent with the structured
//! document.
//!
//! ```text
//!             edit_text                 apply (ok)
//!   InSync ─────────────► UserEditingText ─────────► InSync
//!     ▲                        │  ▲
//!     │                 apply  │  │ edit_text
//!     │                (error) ▼  │
//!     └──── resync ───────── TextError
//! ```
//!
//! - Text reaches the document only through an explicit apply
//! - A failed apply keeps the buffer verbatim and records a diagnostic;
//!   the document is not touched
//! - Any document change other than a successful apply regenerates the
//!   buffer and clears the diagnostic: structured edits win over a stale
//!   unapplied buffer

use crate::document::Value;
use crate::errors::{EditorError, TextDiagnostic};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    InSync,
    UserEditingText,
    TextError,
}

/// Text buffer mirroring a document
#[derive(Debug, Clone)]
pub struct TextSync {
    buffer: String,
    state: SyncState,
    diagnostic: Option<TextDiagnostic>,
}

impl TextSync {
    /// Buffer initialised from `doc`
    pub fn new(doc: &Value) -> Self {
        Self {
            buffer: doc.to_pretty_string(),
            state: SyncState::InSync,
            diagnostic: None,
        }
    }

    pub fn text(&self) -> &str {
        &self.buffer
    }

    pub fn state(&self) -> SyncState {
        self.state
    }

    /// Diagnostic from the last failed apply, until the next apply or resync
    pub fn diagnostic(&self) -> Option<&TextDiagnostic> {
        self.diagnostic.as_ref()
    }

    /// User typed in the text view; the document is not touched
    pub fn edit_text(&mut self, text: impl Into<String>) {
        self.buffer = text.into();
        self.state = SyncState::UserEditingText;
    }

    /// Parse the buffer. On success the caller must install the returned
    /// value as the whole document; on failure nothing but the sync state
    /// changes.
    pub fn apply(&mut self) -> Result<Value, EditorError> {
        match Value::from_json_str(&self.buffer) {
            Ok(value) => {
                self.state = SyncState::InSync;
                self.diagnostic = None;
                Ok(value)
            }
            Err(e) => {
                let diagnostic = TextDiagnostic::from(e);
                tracing::warn!(
                    line = diagnostic.line,
                    column = diagnostic.column,
                    "Text view did not parse: {}",
                    diagnostic.message
                );
                self.state = SyncState::TextError;
                self.diagnostic = Some(diagnostic.clone());
                Err(EditorError::MalformedText(diagnostic))
            }
        }
    }

    /// The document changed for some reason other than an apply
    pub fn resync(&mut self, doc: &Value) {
        if self.state != SyncState::InSync {
            tracing::debug!("Discarding unapplied text after document change");
        }
        self.buffer = doc.to_pretty_string();
        self.state = SyncState::InSync;
        self.diagnostic = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(text: &str) -> Value {
        Value::from_json_str(text).unwrap()
    }

    #[test]
    fn test_initial_text_matches_document() {
        let d = doc(r#"{"client":"Acme","sites":[{"name":"HQ"}]}"#);
        let sync = TextSync::new(&d);

        assert_eq!(sync.state(), SyncState::InSync);
        assert_eq!(Value::from_json_str(sync.text()).unwrap(), d);
        assert!(sync.text().contains("\n  \"client\": \"Acme\""));
    }

    #[test]
    fn test_apply_success() {
        let mut sync = TextSync::new(&doc("{}"));
        sync.edit_text(r#"{"client":"Beta"}"#);
        assert_eq!(sync.state(), SyncState::UserEditingText);

        let applied = sync.apply().unwrap();
        assert_eq!(applied, doc(r#"{"client":"Beta"}"#));
        assert_eq!(sync.state(), SyncState::InSync);
        // buffer is kept as typed
        assert_eq!(sync.text(), r#"{"client":"Beta"}"#);
    }

    #[test]
    fn test_apply_failure_keeps_buffer() {
        let mut sync = TextSync::new(&doc("{}"));
        sync.edit_text("{\n  \"client\": \n}");

        let err = sync.apply().unwrap_err();
        assert!(matches!(err, EditorError::MalformedText(_)));
        assert_eq!(sync.state(), SyncState::TextError);
        assert_eq!(sync.text(), "{\n  \"client\": \n}");

        let diagnostic = sync.diagnostic().unwrap();
        assert_eq!(diagnostic.line, 3);
        assert!(!diagnostic.message.contains("at line"));
    }

    #[test]
    fn test_typing_after_error_keeps_diagnostic_until_apply() {
        let mut sync = TextSync::new(&doc("{}"));
        sync.edit_text("{");
        let _ = sync.apply();

        sync.edit_text("{}");
        assert_eq!(sync.state(), SyncState::UserEditingText);
        assert!(sync.diagnostic().is_some());

        sync.apply().unwrap();
        assert!(sync.diagnostic().is_none());
    }

    #[test]
    fn test_resync_discards_stale_text() {
        let mut sync = TextSync::new(&doc("{}"));
        sync.edit_text("not json");
        let _ = sync.apply();

        let next = doc(r#"{"client":"Gamma"}"#);
        sync.resync(&next);

        assert_eq!(sync.state(), SyncState::InSync);
        assert!(sync.diagnostic().is_none());
        assert_eq!(Value::from_json_str(sync.text()).unwrap(), next);
    }
}
