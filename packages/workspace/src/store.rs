//! Session persistence: opaque values stored under string keys.

use crate::errors::StoreResult;
use loe_editor::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

/// Blob store for a wizard session. Saving `None` deletes the key.
pub trait SessionStore: Send + Sync {
    fn load(&self, key: &str) -> StoreResult<Option<Value>>;

    fn save(&self, key: &str, value: Option<&Value>) -> StoreResult<()>;

    fn clear(&self, keys: &[&str]) -> StoreResult<()> {
        for key in keys {
            self.save(key, None)?;
        }
        Ok(())
    }
}

/// Process-local store
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemoryStore {
    fn load(&self, key: &str) -> StoreResult<Option<Value>> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(key).cloned())
    }

    fn save(&self, key: &str, value: Option<&Value>) -> StoreResult<()> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        match value {
            Some(value) => {
                entries.insert(key.to_string(), value.clone());
            }
            None => {
                entries.remove(key);
            }
        }
        Ok(())
    }
}

/// One pretty-printed JSON file per key inside a directory
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File backing `key`; characters outside `[A-Za-z0-9_-]` become `_`
    pub fn path_for(&self, key: &str) -> PathBuf {
        let name: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.dir.join(format!("{}.json", name))
    }
}

impl SessionStore for FileStore {
    fn load(&self, key: &str) -> StoreResult<Option<Value>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }

        let text = std::fs::read_to_string(&path)?;
        match Value::from_json_str(&text) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                // A damaged entry reads as absent, like a cleared session
                tracing::warn!("Ignoring unreadable session entry {}: {}", path.display(), e);
                Ok(None)
            }
        }
    }

    fn save(&self, key: &str, value: Option<&Value>) -> StoreResult<()> {
        let path = self.path_for(key);
        match value {
            Some(value) => {
                std::fs::create_dir_all(&self.dir)?;
                std::fs::write(&path, serde_json::to_string_pretty(value)?)?;
                tracing::debug!("Saved session entry {}", path.display());
            }
            None => {
                if path.exists() {
                    std::fs::remove_file(&path)?;
                    tracing::debug!("Removed session entry {}", path.display());
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use loe_editor::default_document;
    use tempfile::TempDir;

    #[test]
    fn test_memory_store_round_trip() {
        let store = MemoryStore::new();
        let doc = default_document("rack_stack");

        store.save("rack_stack_schema", Some(&doc)).unwrap();
        let loaded = store.load("rack_stack_schema").unwrap().unwrap();
        assert!(loaded.ptr_eq(&doc));

        store.save("rack_stack_schema", None).unwrap();
        assert!(store.load("rack_stack_schema").unwrap().is_none());
    }

    #[test]
    fn test_file_store_round_trip() {
        let temp = TempDir::new().unwrap();
        let store = FileStore::new(temp.path().join(".loe"));
        let doc = default_document("rack_stack");

        assert!(store.load("rack_stack_schema").unwrap().is_none());

        store.save("rack_stack_schema", Some(&doc)).unwrap();
        assert!(store.path_for("rack_stack_schema").exists());
        assert_eq!(store.load("rack_stack_schema").unwrap(), Some(doc));

        store.clear(&["rack_stack_schema", "never_saved"]).unwrap();
        assert!(!store.path_for("rack_stack_schema").exists());
    }

    #[test]
    fn test_file_store_key_sanitising() {
        let store = FileStore::new("/tmp/sessions");
        assert_eq!(
            store.path_for("../etc/passwd"),
            PathBuf::from("/tmp/sessions/___etc_passwd.json")
        );
    }

    #[test]
    fn test_corrupt_entry_reads_as_absent() {
        let temp = TempDir::new().unwrap();
        let store = FileStore::new(temp.path());
        std::fs::write(store.path_for("broken"), "{ not json").unwrap();

        assert!(store.load("broken").unwrap().is_none());
    }
}
