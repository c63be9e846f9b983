//! JSON file holding the last executed task.

use shokunin_application::{StatusStoreError, TaskStatusRecord, TaskStatusStore};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Status file location relative to the working directory
pub const DEFAULT_STATUS_PATH: &str = ".pdca/current_task.json";

/// Stores one [`TaskStatusRecord`] as pretty-printed JSON
pub struct JsonTaskStatusStore {
    path: PathBuf,
}

impl JsonTaskStatusStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for JsonTaskStatusStore {
    fn default() -> Self {
        Self::new(DEFAULT_STATUS_PATH)
    }
}

impl TaskStatusStore for JsonTaskStatusStore {
    fn save(&self, record: &TaskStatusRecord) -> Result<(), StatusStoreError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(record)?;
        std::fs::write(&self.path, json)?;
        debug!("Saved task status to {}", self.path.display());
        Ok(())
    }

    fn load(&self) -> Result<Option<TaskStatusRecord>, StatusStoreError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_str(&content)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use shokunin_domain::ExecutionMode;

    fn record() -> TaskStatusRecord {
        TaskStatusRecord {
            task: "build a blog system".to_string(),
            created_at: Utc::now(),
            status: "executed".to_string(),
            mode: ExecutionMode::RealParallel,
            source: "pdca".to_string(),
        }
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonTaskStatusStore::new(dir.path().join(".pdca/current_task.json"));
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonTaskStatusStore::new(dir.path().join(".pdca/current_task.json"));
        let record = record();

        store.save(&record).unwrap();

        assert_eq!(store.load().unwrap(), Some(record));
        let raw = std::fs::read_to_string(store.path()).unwrap();
        assert!(raw.contains("\"mode\": \"real_parallel\""));
    }

    #[test]
    fn test_save_overwrites_previous_task() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonTaskStatusStore::new(dir.path().join("status.json"));

        store.save(&record()).unwrap();
        let mut second = record();
        second.task = "add search".to_string();
        store.save(&second).unwrap();

        assert_eq!(store.load().unwrap().unwrap().task, "add search");
    }

    #[test]
    fn test_corrupt_file_is_format_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("status.json");
        std::fs::write(&path, "{not json").unwrap();

        let err = JsonTaskStatusStore::new(path).load().unwrap_err();
        assert!(matches!(err, StatusStoreError::Format(_)));
    }
}
