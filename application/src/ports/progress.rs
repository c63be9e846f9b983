//! Progress notification port
//!
//! Defines the interface for reporting progress while the experts run.

use shokunin_domain::{AttemptRecord, BatchOutcome, ExecutionResult, ExpertRole};

/// Callback for progress updates during a batch
///
/// Implementations live in the presentation layer. Callbacks fire from
/// concurrently running experts, so implementations must be thread-safe.
pub trait ProgressNotifier: Send + Sync {
    /// Called once before any expert is dispatched
    fn on_batch_start(&self, roles: &[ExpertRole]);

    /// Called when a failed attempt will be retried after a backoff
    fn on_retry_scheduled(&self, _role: ExpertRole, _attempt: &AttemptRecord) {}

    /// Called when an expert produces its final result
    fn on_expert_complete(&self, result: &ExecutionResult);

    /// Called once after the degradation decision
    fn on_batch_complete(&self, outcome: &BatchOutcome);
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl ProgressNotifier for NoProgress {
    fn on_batch_start(&self, _roles: &[ExpertRole]) {}
    fn on_expert_complete(&self, _result: &ExecutionResult) {}
    fn on_batch_complete(&self, _outcome: &BatchOutcome) {}
}
