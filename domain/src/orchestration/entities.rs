//! Orchestration domain entities

use super::policy::DegradationPolicy;
use super::value_objects::{ExecutionResult, TokenUsage};
use crate::core::task::Task;
use crate::expert::role::ExpertRole;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How the results of a batch were produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionMode {
    /// Real per-expert results from the generation backend
    RealParallel,
    /// Deterministic mock results for every expert
    MockSimulation,
}

impl ExecutionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExecutionMode::RealParallel => "real_parallel",
            ExecutionMode::MockSimulation => "mock_simulation",
        }
    }
}

impl std::fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Why a batch ended up in mock mode
///
/// Distinct causes, identical degraded output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DegradationCause {
    /// No generation backend was configured
    BackendUnavailable,
    /// Too many experts failed or timed out
    FailureThreshold { failed: usize, threshold: usize },
}

impl std::fmt::Display for DegradationCause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DegradationCause::BackendUnavailable => write!(f, "no generation backend configured"),
            DegradationCause::FailureThreshold { failed, threshold } => write!(
                f,
                "{} experts failed (threshold {})",
                failed, threshold
            ),
        }
    }
}

/// Complete outcome of one batch (Entity)
///
/// Always holds exactly one result per dispatched expert, sorted by role.
/// Results are either all real or all mock, never mixed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchOutcome {
    pub task: Task,
    pub mode: ExecutionMode,
    pub results: Vec<ExecutionResult>,
    pub elapsed: Duration,
    /// Experts that failed or timed out, counted before any degradation
    pub failures: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub degradation: Option<DegradationCause>,
    /// Tokens consumed by every attempt, including discarded ones
    pub usage: TokenUsage,
}

impl BatchOutcome {
    /// Apply the degradation policy to the collected results.
    ///
    /// Keeps the real results when the failure count stays below the
    /// policy threshold; otherwise replaces every result with mock output.
    pub fn from_results(
        task: Task,
        mut results: Vec<ExecutionResult>,
        elapsed: Duration,
        policy: DegradationPolicy,
    ) -> Self {
        results.sort_by_key(|r| r.role);
        let total = results.len();
        let failures = results.iter().filter(|r| r.is_failed()).count();
        let usage = results.iter().map(|r| r.usage).sum();

        if policy.should_degrade(failures, total) {
            let cause = DegradationCause::FailureThreshold {
                failed: failures,
                threshold: policy.threshold(total),
            };
            let results = results.into_iter().map(|r| r.demoted(&task)).collect();
            return Self {
                task,
                mode: ExecutionMode::MockSimulation,
                results,
                elapsed,
                failures,
                degradation: Some(cause),
                usage,
            };
        }

        Self {
            task,
            mode: ExecutionMode::RealParallel,
            results,
            elapsed,
            failures,
            degradation: None,
            usage,
        }
    }

    /// Outcome when no generation backend exists: every expert is mocked
    pub fn unavailable(task: Task, roles: &[ExpertRole], elapsed: Duration) -> Self {
        let mut roles = roles.to_vec();
        roles.sort();
        let results = roles
            .into_iter()
            .map(|role| ExecutionResult::mock(role, &task))
            .collect();
        Self {
            task,
            mode: ExecutionMode::MockSimulation,
            results,
            elapsed,
            failures: 0,
            degradation: Some(DegradationCause::BackendUnavailable),
            usage: TokenUsage::default(),
        }
    }

    pub fn agent_count(&self) -> usize {
        self.results.len()
    }

    pub fn is_degraded(&self) -> bool {
        self.degradation.is_some()
    }

    pub fn result(&self, role: ExpertRole) -> Option<&ExecutionResult> {
        self.results.iter().find(|r| r.role == role)
    }

    /// Results that did not fail (real or mock)
    pub fn completed_results(&self) -> impl Iterator<Item = &ExecutionResult> {
        self.results.iter().filter(|r| !r.is_failed())
    }

    pub fn failed_results(&self) -> impl Iterator<Item = &ExecutionResult> {
        self.results.iter().filter(|r| r.is_failed())
    }
}
