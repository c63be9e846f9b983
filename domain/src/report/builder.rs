//! Report builder - merges per-expert results into one structured report.

use crate::core::error::FailureCause;
use crate::core::string::truncate_chars;
use crate::expert::role::ExpertRole;
use crate::orchestration::entities::{BatchOutcome, DegradationCause, ExecutionMode};
use crate::orchestration::value_objects::{ExecutionStatus, TokenUsage};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// Characters of expert text shown before truncation
pub const DEFAULT_DISPLAY_LIMIT: usize = 200;

/// One expert's entry in the report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportEntry {
    #[serde(skip)]
    pub role: ExpertRole,
    pub status: ExecutionStatus,
    /// Untruncated payload
    pub text: String,
    /// Payload cut to the display limit
    #[serde(skip)]
    pub display_text: String,
    pub attempts: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<FailureCause>,
}

impl ReportEntry {
    pub fn is_truncated(&self) -> bool {
        self.display_text != self.text
    }
}

/// Structured report for one batch
///
/// Serializes to the stable outbound shape consumed by presentation
/// layers; `results` is an object keyed by expert identity in role order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub task: String,
    pub mode: ExecutionMode,
    pub execution_time_seconds: f64,
    pub agent_count: usize,
    pub failures: usize,
    pub degraded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub degradation: Option<DegradationCause>,
    #[serde(serialize_with = "serialize_entries")]
    pub results: Vec<ReportEntry>,
    pub summary: String,
    pub token_usage: TokenUsage,
}

fn serialize_entries<S>(entries: &[ReportEntry], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let mut map = serializer.serialize_map(Some(entries.len()))?;
    for entry in entries {
        map.serialize_entry(entry.role.as_str(), entry)?;
    }
    map.end()
}

/// Builds [`Report`]s from batch outcomes. Pure: no I/O, same input gives
/// the same report.
#[derive(Debug, Clone, Copy)]
pub struct ReportBuilder {
    display_limit: usize,
}

impl Default for ReportBuilder {
    fn default() -> Self {
        Self {
            display_limit: DEFAULT_DISPLAY_LIMIT,
        }
    }
}

impl ReportBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_display_limit(mut self, limit: usize) -> Self {
        self.display_limit = limit;
        self
    }

    pub fn build(&self, outcome: &BatchOutcome) -> Report {
        let results = outcome
            .results
            .iter()
            .map(|r| ReportEntry {
                role: r.role,
                status: r.status,
                text: r.text.clone(),
                display_text: truncate_chars(&r.text, self.display_limit),
                attempts: r.attempts,
                failure: r.failure,
            })
            .collect();

        Report {
            task: outcome.task.description().to_string(),
            mode: outcome.mode,
            execution_time_seconds: outcome.elapsed.as_secs_f64(),
            agent_count: outcome.agent_count(),
            failures: outcome.failures,
            degraded: outcome.is_degraded(),
            degradation: outcome.degradation,
            results,
            summary: Self::summary(outcome),
            token_usage: outcome.usage,
        }
    }

    /// One-line summary, phrased the same in every mode
    ///
    /// Counts results that produced display text. After degradation every
    /// result is demoted to mock text and counts as completed, so a fully
    /// degraded batch reads "N/N" while `failures` keeps the real count.
    pub fn summary(outcome: &BatchOutcome) -> String {
        format!(
            "{}/{} agents completed",
            outcome.completed_results().count(),
            outcome.agent_count()
        )
    }
}
