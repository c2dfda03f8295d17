//! # Generation Lifecycle
//!
//! "Submit document, await artifact" as an explicit state machine keyed by
//! input identity.
//!
//! ```text
//!              select(doc)                 settle(current, ok)
//!   Idle ─────────────────► Pending(n) ───────────────────────► Success(n)
//!                            │   ▲                   │
//!         settle(current,err)│   │select(other doc)  │
//!                            ▼   │                   │
//!                          Failed(n) ◄───────────────┘ (next select)
//! ```
//!
//! Every selection of a new document gets a fresh [`InputId`]. A result
//! carrying any other id is stale and is dropped without a trace in the
//! visible state. Nothing is aborted: the stale request still completes,
//! its effect is suppressed.

use crate::errors::RequestError;
use loe_editor::Value;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Output of the generate endpoint
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationArtifact {
    #[serde(default)]
    pub summary: String,

    #[serde(default)]
    pub tasks: String,

    #[serde(default)]
    pub open_questions: Vec<String>,
}

impl GenerationArtifact {
    /// Read a generate response. Missing or null fields become empty;
    /// non-string questions are rendered as JSON text.
    pub fn from_response(response: &serde_json::Value) -> Self {
        let text = |key: &str| match response.get(key) {
            Some(serde_json::Value::String(s)) => s.clone(),
            Some(serde_json::Value::Null) | None => String::new(),
            Some(other) => other.to_string(),
        };

        let open_questions = match response.get("open_questions") {
            Some(serde_json::Value::Array(items)) => items
                .iter()
                .map(|item| match item {
                    serde_json::Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect(),
            _ => Vec::new(),
        };

        Self {
            summary: text("summary"),
            tasks: text("tasks"),
            open_questions,
        }
    }
}

/// Identity of one selected input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InputId(u64);

impl fmt::Display for InputId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Visible generation state
#[derive(Debug, Clone, Default, PartialEq)]
pub enum GenerationState {
    #[default]
    Idle,
    Pending {
        input: InputId,
    },
    Success {
        input: InputId,
        artifact: GenerationArtifact,
    },
    Failed {
        input: InputId,
        error: RequestError,
    },
}

impl GenerationState {
    pub fn input(&self) -> Option<InputId> {
        match self {
            GenerationState::Idle => None,
            GenerationState::Pending { input }
            | GenerationState::Success { input, .. }
            | GenerationState::Failed { input, .. } => Some(*input),
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, GenerationState::Pending { .. })
    }

    pub fn artifact(&self) -> Option<&GenerationArtifact> {
        match self {
            GenerationState::Success { artifact, .. } => Some(artifact),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&RequestError> {
        match self {
            GenerationState::Failed { error, .. } => Some(error),
            _ => None,
        }
    }
}

/// Work order for one request
#[derive(Debug, Clone)]
pub struct GenerationTicket {
    pub input: InputId,
    pub document: Value,
}

/// Outcome of [`GenerationLifecycle::select`]
#[derive(Debug, Clone)]
pub enum Selection {
    /// A new request must be issued for the ticket
    Started(GenerationTicket),

    /// Same document as the current input; nothing to do
    Unchanged(InputId),
}

#[derive(Debug, Default)]
pub struct GenerationLifecycle {
    last_id: u64,
    current: Option<(InputId, Value)>,
    state: GenerationState,
}

impl GenerationLifecycle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &GenerationState {
        &self.state
    }

    /// Make `document` the current input. A structurally equal document
    /// that is pending or already succeeded is left alone; after a failure
    /// selecting it again retries.
    pub fn select(&mut self, document: Value) -> Selection {
        if let Some((input, current)) = &self.current {
            let settled_ok = !matches!(self.state(), GenerationState::Failed { .. });
            if settled_ok && *current == document {
                return Selection::Unchanged(*input);
            }
        }

        Selection::Started(self.restart(document))
    }

    /// Start over for `document` unconditionally (manual retry)
    pub fn restart(&mut self, document: Value) -> GenerationTicket {
        self.last_id += 1;
        let input = InputId(self.last_id);

        if let GenerationState::Pending { input: stale } = &self.state {
            tracing::debug!("Generation {} superseded by {}", stale, input);
        }
        tracing::info!("Generation {} started", input);

        self.current = Some((input, document.clone()));
        self.state = GenerationState::Pending { input };

        GenerationTicket { input, document }
    }

    pub fn is_current(&self, input: InputId) -> bool {
        matches!(&self.current, Some((current, _)) if *current == input)
    }

    /// Deliver the result for `input`. Returns false, with no state change,
    /// when the result is stale.
    pub fn settle(
        &mut self,
        input: InputId,
        result: Result<GenerationArtifact, RequestError>,
    ) -> bool {
        if !self.is_current(input) || !self.state().is_pending() {
            tracing::debug!("Discarding stale generation result {}", input);
            return false;
        }

        self.state = match result {
            Ok(artifact) => {
                tracing::info!("Generation {} succeeded", input);
                GenerationState::Success { input, artifact }
            }
            Err(error) => {
                tracing::warn!("Generation {} failed: {}", input, error);
                GenerationState::Failed { input, error }
            }
        };
        true
    }
}
