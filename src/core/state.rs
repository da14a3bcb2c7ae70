//! Saved session record: the last query and the history, carried across
//! picker openings.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::Result;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionState {
    pub query: String,
    pub history: Vec<String>,
}

pub trait SessionStore {
    fn load(&self) -> Result<SessionState>;
    fn save(&self, state: &SessionState) -> Result<()>;

    /// Unreadable state is dropped; the next save writes a fresh record.
    fn load_or_default(&self) -> SessionState {
        self.load().unwrap_or_else(|err| {
            warn!(error = %err, code = err.code(), "ignoring unreadable session state");
            SessionState::default()
        })
    }
}

/// Lives as long as its owner. The first load creates an empty record.
#[derive(Debug, Default)]
pub struct MemoryStore {
    record: Mutex<Option<SessionState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemoryStore {
    fn load(&self) -> Result<SessionState> {
        let mut record = self
            .record
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        Ok(record.get_or_insert_with(SessionState::default).clone())
    }

    fn save(&self, state: &SessionState) -> Result<()> {
        let mut record = self
            .record
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *record = Some(state.clone());
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for JsonFileStore {
    fn load(&self) -> Result<SessionState> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no saved session, starting empty");
                return Ok(SessionState::default());
            }
            Err(err) => return Err(err.into()),
        };
        Ok(serde_json::from_str(&raw)?)
    }

    fn save(&self, state: &SessionState) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let raw = serde_json::to_string_pretty(state)?;
        fs::write(&self.path, raw)?;
        debug!(path = %self.path.display(), entries = state.history.len(), "saved session");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{JsonFileStore, MemoryStore, SessionState, SessionStore};

    fn sample() -> SessionState {
        SessionState {
            query: "scene".to_string(),
            history: vec!["Assets/a.unity".to_string(), "Assets/b.cs".to_string()],
        }
    }

    #[test]
    fn memory_store_starts_empty_and_keeps_last_save() {
        let store = MemoryStore::new();
        assert_eq!(store.load().expect("load"), SessionState::default());
        store.save(&sample()).expect("save");
        assert_eq!(store.load().expect("load"), sample());
    }

    #[test]
    fn separate_memory_stores_are_isolated() {
        let first = MemoryStore::new();
        let second = MemoryStore::new();
        first.save(&sample()).expect("save");
        assert!(second.load().expect("load").history.is_empty());
    }

    #[test]
    fn json_store_missing_file_loads_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = JsonFileStore::new(dir.path().join("absent.json"));
        assert_eq!(store.load().expect("load"), SessionState::default());
    }

    #[test]
    fn json_store_creates_parent_directories() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = JsonFileStore::new(dir.path().join("nested/state/session.json"));
        store.save(&sample()).expect("save");
        assert_eq!(store.load().expect("load"), sample());
    }

    #[test]
    fn json_store_tolerates_missing_fields() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("session.json");
        std::fs::write(&path, r#"{"history":["x"]}"#).expect("write");
        let state = JsonFileStore::new(path).load().expect("load");
        assert_eq!(state.query, "");
        assert_eq!(state.history, vec!["x"]);
    }

    #[test]
    fn json_store_reports_corrupt_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("session.json");
        std::fs::write(&path, "not json").expect("write");
        let err = JsonFileStore::new(path).load().expect_err("corrupt");
        assert_eq!(err.code(), "JSON_ERROR");
    }

    #[test]
    fn corrupt_file_falls_back_to_empty_and_is_rewritten() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(".quickfind/session.json");
        std::fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
        std::fs::write(&path, "not json").expect("write");

        let store = JsonFileStore::new(&path);
        assert_eq!(store.load_or_default(), SessionState::default());

        store.save(&sample()).expect("save");
        assert_eq!(store.load().expect("load"), sample());
    }

    #[test]
    fn unreadable_path_falls_back_to_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = JsonFileStore::new(dir.path());
        assert!(store.load().is_err());
        assert_eq!(store.load_or_default(), SessionState::default());
    }
}
