//! Everything a command needs: config, session store and backend client.
//!
//! Session entries are keyed by assistant type:
//! `{loe_type}_schema` holds the document, `{loe_type}_history` its
//! undo/redo history, `{loe_type}_draft` unapplied text and
//! `{loe_type}_output` the last generated report.

use crate::config::Config;
use anyhow::{anyhow, Context, Result};
use loe_editor::{EditSession, UndoStack, Value};
use loe_workspace::{
    ApiClient, FileStore, GenerationArtifact, HttpTransport, MockTransport, SessionStore,
};
use std::sync::Arc;

pub struct Workbench {
    pub config: Config,
    store: FileStore,
}

impl Workbench {
    pub fn open(cwd: &str) -> Result<Self> {
        let config = Config::load(cwd)?;
        let store = FileStore::new(config.get_session_dir(cwd));
        tracing::debug!("Session directory {}", store.dir().display());

        Ok(Self { config, store })
    }

    pub fn document_key(&self) -> String {
        format!("{}_schema", self.config.loe_type)
    }

    fn history_key(&self) -> String {
        format!("{}_history", self.config.loe_type)
    }

    fn draft_key(&self) -> String {
        format!("{}_draft", self.config.loe_type)
    }

    fn output_key(&self) -> String {
        format!("{}_output", self.config.loe_type)
    }

    pub fn has_document(&self) -> Result<bool> {
        Ok(self.store.load(&self.document_key())?.is_some())
    }

    /// Session over the stored document
    pub fn load_session(&self) -> Result<EditSession> {
        let key = self.document_key();
        let document = self
            .store
            .load(&key)?
            .ok_or_else(|| anyhow!("No document yet. Run `loe paste` or `loe new` first"))?;

        Ok(EditSession::new(key, document).with_history(self.load_history()?))
    }

    /// Unreadable history is dropped rather than blocking the document
    fn load_history(&self) -> Result<UndoStack> {
        let Some(value) = self.store.load(&self.history_key())? else {
            return Ok(UndoStack::new());
        };

        match serde_json::from_value(serde_json::Value::from(&value)) {
            Ok(history) => Ok(history),
            Err(e) => {
                tracing::warn!("Ignoring unreadable undo history: {}", e);
                Ok(UndoStack::new())
            }
        }
    }

    /// Persist the session document and its history. Any unapplied text
    /// is dropped, the same way a structured edit discards a stale text
    /// buffer.
    pub fn save_session(&self, session: &EditSession) -> Result<()> {
        let history = Value::from(serde_json::to_value(session.history())?);
        self.store.save(&session.id, Some(session.document()))?;
        self.store.save(&self.history_key(), Some(&history))?;
        self.store.save(&self.draft_key(), None)?;
        tracing::debug!("Saved {} at version {}", session.id, session.version);
        Ok(())
    }

    pub fn load_draft(&self) -> Result<Option<String>> {
        let draft = self.store.load(&self.draft_key())?;
        Ok(draft.and_then(|d| d.as_str().map(str::to_string)))
    }

    pub fn save_draft(&self, text: &str) -> Result<()> {
        self.store.save(&self.draft_key(), Some(&Value::from(text)))?;
        Ok(())
    }

    pub fn load_output(&self) -> Result<Option<GenerationArtifact>> {
        match self.store.load(&self.output_key())? {
            Some(value) => Ok(Some(GenerationArtifact::from_response(
                &serde_json::Value::from(&value),
            ))),
            None => Ok(None),
        }
    }

    pub fn save_output(&self, artifact: Option<&GenerationArtifact>) -> Result<()> {
        let value = artifact
            .map(serde_json::to_value)
            .transpose()?
            .map(Value::from);
        self.store.save(&self.output_key(), value.as_ref())?;
        Ok(())
    }

    /// Forget the document and everything derived from it
    pub fn clear(&self) -> Result<()> {
        let keys = [
            self.document_key(),
            self.history_key(),
            self.draft_key(),
            self.output_key(),
        ];
        let keys: Vec<&str> = keys.iter().map(String::as_str).collect();
        self.store.clear(&keys)?;
        Ok(())
    }

    pub fn api_client(&self) -> Result<ApiClient> {
        if self.config.mock {
            tracing::info!("Using mock backend");
            return Ok(ApiClient::new(Arc::new(MockTransport::new())));
        }

        let transport = HttpTransport::new(&self.config.api_base, self.config.timeout())
            .context("Failed to create HTTP client")?;
        Ok(ApiClient::new(Arc::new(transport)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_CONFIG_NAME;
    use loe_editor::{default_document, EditEvent};
    use tempfile::TempDir;

    fn workbench(temp: &TempDir) -> Workbench {
        std::fs::write(temp.path().join(DEFAULT_CONFIG_NAME), r#"{"mock": true}"#).unwrap();
        Workbench::open(&temp.path().display().to_string()).unwrap()
    }

    #[test]
    fn test_session_round_trip() {
        let temp = TempDir::new().unwrap();
        let bench = workbench(&temp);

        assert!(bench.load_session().is_err());
        assert!(!bench.has_document().unwrap());

        let session = EditSession::new(bench.document_key(), default_document("rack_stack"));
        bench.save_draft("{ half typed").unwrap();
        bench.save_session(&session).unwrap();

        let reopened = bench.load_session().unwrap();
        assert_eq!(reopened.id, "rack_stack_schema");
        assert_eq!(reopened.document(), session.document());
        assert_eq!(bench.load_draft().unwrap(), None);
    }

    #[test]
    fn test_history_survives_reopen() {
        let temp = TempDir::new().unwrap();
        let bench = workbench(&temp);
        let client: loe_editor::Path = "client".parse().unwrap();

        let mut session = EditSession::new(bench.document_key(), default_document("rack_stack"));
        session.apply_edit(EditEvent::new(client, "Acme"));
        bench.save_session(&session).unwrap();

        let mut reopened = bench.load_session().unwrap();
        assert!(reopened.can_undo());
        assert!(reopened.undo());
        bench.save_session(&reopened).unwrap();

        let mut reopened = bench.load_session().unwrap();
        assert_eq!(reopened.document(), &default_document("rack_stack"));
        assert!(reopened.redo());
        assert_eq!(reopened.document().get("client"), Some(&Value::from("Acme")));

        std::fs::write(bench.store.path_for(&bench.history_key()), "{ broken").unwrap();
        let reopened = bench.load_session().unwrap();
        assert!(!reopened.can_undo());
    }

    #[test]
    fn test_output_round_trip_and_clear() {
        let temp = TempDir::new().unwrap();
        let bench = workbench(&temp);
        let artifact = GenerationArtifact {
            summary: "S".to_string(),
            tasks: "T".to_string(),
            open_questions: vec!["Q".to_string()],
        };

        bench.save_output(Some(&artifact)).unwrap();
        assert_eq!(bench.load_output().unwrap(), Some(artifact));

        bench.clear().unwrap();
        assert_eq!(bench.load_output().unwrap(), None);
    }
}
