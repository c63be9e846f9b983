//! Task status persistence port
//!
//! After a run the CLI records what it did so `--status` can show it later.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shokunin_domain::{BatchOutcome, ExecutionMode};
use thiserror::Error;

/// Errors from the status store
#[derive(Error, Debug)]
pub enum StatusStoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid status file: {0}")]
    Format(#[from] serde_json::Error),
}

/// The last executed task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskStatusRecord {
    pub task: String,
    pub created_at: DateTime<Utc>,
    pub status: String,
    pub mode: ExecutionMode,
    pub source: String,
}

impl TaskStatusRecord {
    pub fn from_outcome(outcome: &BatchOutcome, source: impl Into<String>) -> Self {
        Self {
            task: outcome.task.description().to_string(),
            created_at: Utc::now(),
            status: "executed".to_string(),
            mode: outcome.mode,
            source: source.into(),
        }
    }
}

/// Storage for the last task status
pub trait TaskStatusStore: Send + Sync {
    fn save(&self, record: &TaskStatusRecord) -> Result<(), StatusStoreError>;

    /// Returns `None` when nothing has been recorded yet
    fn load(&self) -> Result<Option<TaskStatusRecord>, StatusStoreError>;
}
