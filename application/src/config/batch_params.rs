//! Batch parameters - retry and deadline control.
//!
//! [`BatchParams`] groups the static parameters that control one run of
//! [`RunExpertsUseCase`](crate::use_cases::run_experts::RunExpertsUseCase):
//! the shared batch deadline, each expert's retry budget and backoff, and
//! the degradation policy.

use serde::{Deserialize, Serialize};
use shokunin_domain::DegradationPolicy;
use std::time::Duration;

/// Batch execution parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchParams {
    /// Deadline shared by every expert in the batch.
    pub batch_timeout: Duration,
    /// Maximum generation attempts per expert.
    pub max_attempts: u32,
    /// Base backoff; attempt `n` waits `backoff_unit * 2^n` before retrying.
    pub backoff_unit: Duration,
    /// Optional limit for a single generation attempt.
    pub attempt_timeout: Option<Duration>,
    /// When a batch is demoted to mock output.
    pub policy: DegradationPolicy,
}

impl Default for BatchParams {
    fn default() -> Self {
        Self {
            batch_timeout: Duration::from_secs(120),
            max_attempts: 3,
            backoff_unit: Duration::from_secs(1),
            attempt_timeout: None,
            policy: DegradationPolicy::default(),
        }
    }
}

impl BatchParams {
    // ==================== Builder Methods ====================

    pub fn with_batch_timeout(mut self, timeout: Duration) -> Self {
        self.batch_timeout = timeout;
        self
    }

    /// Set the batch timeout from fractional seconds.
    ///
    /// See [`duration_from_secs`](Self::duration_from_secs) for clamping.
    pub fn with_timeout_seconds(self, seconds: f64) -> Self {
        self.with_batch_timeout(Self::duration_from_secs(seconds))
    }

    pub fn with_max_attempts(mut self, max: u32) -> Self {
        self.max_attempts = max;
        self
    }

    pub fn with_backoff_unit(mut self, unit: Duration) -> Self {
        self.backoff_unit = unit;
        self
    }

    pub fn with_attempt_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.attempt_timeout = timeout;
        self
    }

    pub fn with_policy(mut self, policy: DegradationPolicy) -> Self {
        self.policy = policy;
        self
    }

    // ==================== Derived Values ====================

    /// Convert fractional seconds to a [`Duration`] without panicking.
    ///
    /// NaN and non-positive values become zero; values too large for a
    /// `Duration` (including infinity) saturate to [`Duration::MAX`].
    pub fn duration_from_secs(seconds: f64) -> Duration {
        if seconds.is_nan() || seconds <= 0.0 {
            return Duration::ZERO;
        }
        Duration::try_from_secs_f64(seconds).unwrap_or(Duration::MAX)
    }

    /// Attempts an expert actually makes; at least one.
    pub fn effective_attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }

    /// Delay after failed attempt `attempt` (zero-based).
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt);
        self.backoff_unit.saturating_mul(factor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let params = BatchParams::default();
        assert_eq!(params.batch_timeout, Duration::from_secs(120));
        assert_eq!(params.max_attempts, 3);
        assert_eq!(params.backoff_unit, Duration::from_secs(1));
        assert!(params.attempt_timeout.is_none());
        assert_eq!(params.policy, DegradationPolicy::HalfRoundedUp);
    }

    #[test]
    fn test_exponential_backoff() {
        let params = BatchParams::default();
        assert_eq!(params.backoff_for(0), Duration::from_secs(1));
        assert_eq!(params.backoff_for(1), Duration::from_secs(2));
        assert_eq!(params.backoff_for(2), Duration::from_secs(4));
    }

    #[test]
    fn test_builder() {
        let params = BatchParams::default()
            .with_timeout_seconds(0.01)
            .with_max_attempts(0)
            .with_backoff_unit(Duration::from_millis(5));

        assert_eq!(params.batch_timeout, Duration::from_millis(10));
        assert_eq!(params.effective_attempts(), 1);
        assert_eq!(params.backoff_for(1), Duration::from_millis(10));
    }

    #[test]
    fn test_negative_timeout_clamped() {
        let params = BatchParams::default().with_timeout_seconds(-3.0);
        assert_eq!(params.batch_timeout, Duration::ZERO);
        let params = BatchParams::default().with_timeout_seconds(f64::NAN);
        assert_eq!(params.batch_timeout, Duration::ZERO);
    }

    #[test]
    fn test_huge_timeout_saturates() {
        for seconds in [1e19, 1e20, f64::MAX, f64::INFINITY] {
            let params = BatchParams::default().with_timeout_seconds(seconds);
            assert_eq!(params.batch_timeout, Duration::MAX, "seconds = {seconds}");
        }
    }
}
