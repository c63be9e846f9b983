//! Orchestration configuration from TOML (`[orchestration]` section)
//!
//! ```toml
//! [orchestration]
//! timeout_seconds = 120
//! enable_recorder = true
//! max_attempts = 3
//! backoff_unit_ms = 1000
//! ```

use serde::{Deserialize, Serialize};
use shokunin_application::BatchParams;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOrchestrationConfig {
    /// Deadline for the whole batch, in seconds
    pub timeout_seconds: f64,
    /// Run the Recorder alongside the four mandatory experts
    pub enable_recorder: bool,
    /// Generation attempts per expert
    pub max_attempts: u32,
    /// Backoff unit in milliseconds (attempt n waits unit * 2^n)
    pub backoff_unit_ms: u64,
    /// Optional per-attempt limit in seconds
    pub attempt_timeout_seconds: Option<f64>,
}

impl Default for FileOrchestrationConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 120.0,
            enable_recorder: true,
            max_attempts: 3,
            backoff_unit_ms: 1000,
            attempt_timeout_seconds: None,
        }
    }
}

impl FileOrchestrationConfig {
    /// Convert into application batch parameters
    pub fn to_batch_params(&self) -> BatchParams {
        let attempt_timeout = self
            .attempt_timeout_seconds
            .filter(|s| *s > 0.0)
            .map(BatchParams::duration_from_secs);

        BatchParams::default()
            .with_timeout_seconds(self.timeout_seconds)
            .with_max_attempts(self.max_attempts)
            .with_backoff_unit(Duration::from_millis(self.backoff_unit_ms))
            .with_attempt_timeout(attempt_timeout)
    }
}
