//! Error types for the editor

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EditorError {
    #[error("Malformed text: {0}")]
    MalformedText(#[from] TextDiagnostic),

    #[error("Invalid path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },

    #[error("Nothing to edit at {0}")]
    NotEditable(String),
}

/// Where and why the text view failed to parse
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message} (line {line}, column {column})")]
pub struct TextDiagnostic {
    pub message: String,
    pub line: usize,
    pub column: usize,
}

impl From<serde_json::Error> for TextDiagnostic {
    fn from(e: serde_json::Error) -> Self {
        // serde_json appends its own position to Display; keep the bare reason
        let full = e.to_string();
        let message = match full.rfind(" at line ") {
            Some(idx) => full[..idx].to_string(),
            None => full,
        };

        Self {
            message,
            line: e.line(),
            column: e.column(),
        }
    }
}
