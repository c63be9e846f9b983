//! Orchestration value objects - immutable per-expert result types.
//!
//! - [`TokenUsage`] - tokens reported by the generation backend
//! - [`AttemptRecord`] - one generation attempt inside an expert's retry loop
//! - [`ExecutionResult`] - an expert's final, immutable outcome

use crate::core::error::FailureCause;
use crate::core::task::Task;
use crate::expert::fallback::FallbackText;
use crate::expert::role::ExpertRole;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Token counters reported by the generation backend
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}

impl TokenUsage {
    pub fn new(input_tokens: u64, output_tokens: u64) -> Self {
        Self {
            input_tokens,
            output_tokens,
        }
    }

    pub fn total(&self) -> u64 {
        self.input_tokens + self.output_tokens
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

impl std::ops::Add for TokenUsage {
    type Output = TokenUsage;

    fn add(self, rhs: TokenUsage) -> TokenUsage {
        TokenUsage {
            input_tokens: self.input_tokens + rhs.input_tokens,
            output_tokens: self.output_tokens + rhs.output_tokens,
        }
    }
}

impl std::ops::AddAssign for TokenUsage {
    fn add_assign(&mut self, rhs: TokenUsage) {
        *self = *self + rhs;
    }
}

impl std::iter::Sum for TokenUsage {
    fn sum<I: Iterator<Item = TokenUsage>>(iter: I) -> Self {
        iter.fold(TokenUsage::default(), |acc, u| acc + u)
    }
}

impl std::fmt::Display for TokenUsage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} tokens (input: {}, output: {})",
            self.total(),
            self.input_tokens,
            self.output_tokens
        )
    }
}

/// Outcome of a single generation attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    Success(String),
    Error { cause: FailureCause, message: String },
}

impl AttemptOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, AttemptOutcome::Success(_))
    }
}

/// One attempt inside an expert's retry loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptRecord {
    /// Zero-based attempt index
    pub index: u32,
    pub outcome: AttemptOutcome,
    pub elapsed: Duration,
    /// Backoff scheduled after this attempt, if another attempt follows
    pub backoff: Option<Duration>,
}

impl AttemptRecord {
    pub fn new(index: u32, outcome: AttemptOutcome, elapsed: Duration) -> Self {
        Self {
            index,
            outcome,
            elapsed,
            backoff: None,
        }
    }

    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = Some(backoff);
        self
    }

    /// Number of attempts made up to and including this one
    pub fn attempt_count(&self) -> u32 {
        self.index + 1
    }
}

/// Final status of one expert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionStatus {
    /// Real generated text
    Succeeded,
    /// Every attempt failed, or the batch deadline expired first
    Failed,
    /// Deterministic mock text, counted as completed
    FellBackToMock,
}

impl ExecutionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExecutionStatus::Succeeded => "succeeded",
            ExecutionStatus::Failed => "failed",
            ExecutionStatus::FellBackToMock => "fell_back_to_mock",
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, ExecutionStatus::Failed)
    }
}

impl std::fmt::Display for ExecutionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Final outcome of one expert, produced exactly once
///
/// The text payload is never empty: failures carry fallback text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub role: ExpertRole,
    pub status: ExecutionStatus,
    pub text: String,
    /// Generation attempts consumed
    pub attempts: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<FailureCause>,
    pub elapsed: Duration,
    #[serde(default)]
    pub usage: TokenUsage,
}

impl ExecutionResult {
    /// Build the result from the last attempt of a retry loop.
    ///
    /// A successful attempt yields its text; a failed one yields the
    /// after-failure fallback text for the role.
    pub fn from_last_attempt(
        role: ExpertRole,
        task: &Task,
        last: AttemptRecord,
        elapsed: Duration,
        usage: TokenUsage,
    ) -> Self {
        let attempts = last.attempt_count();
        match last.outcome {
            AttemptOutcome::Success(text) => Self {
                role,
                status: ExecutionStatus::Succeeded,
                text,
                attempts,
                failure: None,
                elapsed,
                usage,
            },
            AttemptOutcome::Error { cause, .. } => Self {
                role,
                status: ExecutionStatus::Failed,
                text: FallbackText::after_failure(role, task, attempts),
                attempts,
                failure: Some(cause),
                elapsed,
                usage,
            },
        }
    }

    /// Result for an expert that never produced real output: mock text,
    /// no attempts.
    pub fn mock(role: ExpertRole, task: &Task) -> Self {
        Self {
            role,
            status: ExecutionStatus::FellBackToMock,
            text: FallbackText::mock(role, task),
            attempts: 0,
            failure: None,
            elapsed: Duration::ZERO,
            usage: TokenUsage::default(),
        }
    }

    /// Replace the payload with mock text while keeping the attempt
    /// history. Used when the whole batch degrades.
    pub fn demoted(self, task: &Task) -> Self {
        Self {
            status: ExecutionStatus::FellBackToMock,
            text: FallbackText::mock(self.role, task),
            ..self
        }
    }

    /// Result for an expert still pending at the batch deadline
    pub fn timed_out(role: ExpertRole, task: &Task, timeout: Duration) -> Self {
        Self {
            role,
            status: ExecutionStatus::Failed,
            text: FallbackText::timed_out(role, task, timeout),
            attempts: 0,
            failure: Some(FailureCause::Timeout),
            elapsed: timeout,
            usage: TokenUsage::default(),
        }
    }

    /// Result for an expert whose task stopped without reporting
    pub fn crashed(role: ExpertRole, task: &Task, elapsed: Duration) -> Self {
        Self {
            role,
            status: ExecutionStatus::Failed,
            text: FallbackText::crashed(role, task),
            attempts: 0,
            failure: Some(FailureCause::TransportFailure),
            elapsed,
            usage: TokenUsage::default(),
        }
    }

    pub fn is_failed(&self) -> bool {
        self.status.is_failed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task() -> Task {
        Task::new("build a blog system")
    }

    #[test]
    fn test_token_usage_sum() {
        let total: TokenUsage = vec![TokenUsage::new(10, 5), TokenUsage::new(3, 2)]
            .into_iter()
            .sum();
        assert_eq!(total, TokenUsage::new(13, 7));
        assert_eq!(total.total(), 20);
        assert!(TokenUsage::default().is_empty());
    }

    #[test]
    fn test_token_usage_display() {
        assert_eq!(
            TokenUsage::new(12, 30).to_string(),
            "42 tokens (input: 12, output: 30)"
        );
    }

    #[test]
    fn test_result_from_successful_attempt() {
        let record = AttemptRecord::new(
            1,
            AttemptOutcome::Success("layered architecture".to_string()),
            Duration::from_millis(20),
        );
        let result = ExecutionResult::from_last_attempt(
            ExpertRole::Design,
            &task(),
            record,
            Duration::from_millis(50),
            TokenUsage::new(1, 2),
        );
        assert_eq!(result.status, ExecutionStatus::Succeeded);
        assert_eq!(result.text, "layered architecture");
        assert_eq!(result.attempts, 2);
        assert!(result.failure.is_none());
    }

    #[test]
    fn test_result_from_failed_attempt_uses_fallback() {
        let record = AttemptRecord::new(
            2,
            AttemptOutcome::Error {
                cause: FailureCause::TransportFailure,
                message: "connection reset".to_string(),
            },
            Duration::from_millis(5),
        );
        let result = ExecutionResult::from_last_attempt(
            ExpertRole::Quality,
            &task(),
            record,
            Duration::from_millis(50),
            TokenUsage::default(),
        );
        assert!(result.is_failed());
        assert_eq!(result.attempts, 3);
        assert_eq!(result.failure, Some(FailureCause::TransportFailure));
        assert_eq!(
            result.text,
            FallbackText::after_failure(ExpertRole::Quality, &task(), 3)
        );
    }

    #[test]
    fn test_mock_and_timeout_results() {
        let mock = ExecutionResult::mock(ExpertRole::Recorder, &task());
        assert_eq!(mock.status, ExecutionStatus::FellBackToMock);
        assert_eq!(mock.attempts, 0);
        assert!(!mock.is_failed());

        let timed_out =
            ExecutionResult::timed_out(ExpertRole::Recorder, &task(), Duration::from_secs(1));
        assert!(timed_out.is_failed());
        assert_eq!(timed_out.failure, Some(FailureCause::Timeout));
        assert!(!timed_out.text.is_empty());
    }

    #[test]
    fn test_demoted_keeps_history() {
        let timed_out =
            ExecutionResult::timed_out(ExpertRole::Design, &task(), Duration::from_secs(1));
        let demoted = timed_out.demoted(&task());
        assert_eq!(demoted.status, ExecutionStatus::FellBackToMock);
        assert_eq!(demoted.text, FallbackText::mock(ExpertRole::Design, &task()));
        assert_eq!(demoted.failure, Some(FailureCause::Timeout));
    }

    #[test]
    fn test_status_serializes_snake_case() {
        let json = serde_json::to_string(&ExecutionStatus::FellBackToMock).unwrap();
        assert_eq!(json, "\"fell_back_to_mock\"");
    }
}
