//! Run Experts use case
//!
//! Fans the expert council out over a [`JoinSet`], waits for every expert or
//! the batch deadline, then applies the degradation policy.

use crate::config::BatchParams;
use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::generation::TextGenerator;
use crate::ports::progress::{NoProgress, ProgressNotifier};
use crate::use_cases::agent_unit::{AgentUnit, ExecutionContext, deadline_after};
use shokunin_domain::{BatchOutcome, ExecutionResult, ExpertRole, Task};
use std::collections::BTreeSet;
use std::sync::Arc;
use tokio::task::JoinSet;
use tokio::time::{Instant, sleep_until};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Input for the RunExperts use case
#[derive(Debug, Clone)]
pub struct RunExpertsInput {
    /// The job every expert works on
    pub task: Task,
    /// Whether the Recorder joins the four mandatory experts
    pub recorder_enabled: bool,
    pub params: BatchParams,
}

impl RunExpertsInput {
    pub fn new(task: impl Into<Task>) -> Self {
        Self {
            task: task.into(),
            recorder_enabled: true,
            params: BatchParams::default(),
        }
    }

    pub fn without_recorder(mut self) -> Self {
        self.recorder_enabled = false;
        self
    }

    pub fn with_recorder(mut self, enabled: bool) -> Self {
        self.recorder_enabled = enabled;
        self
    }

    pub fn with_params(mut self, params: BatchParams) -> Self {
        self.params = params;
        self
    }
}

/// Use case for running the expert council
///
/// Holds no per-run state; every call to [`execute`](Self::execute) builds
/// fresh units and a fresh cancellation token.
pub struct RunExpertsUseCase {
    generator: Option<Arc<dyn TextGenerator>>,
    progress: Arc<dyn ProgressNotifier>,
    conversation_logger: Arc<dyn ConversationLogger>,
}

impl RunExpertsUseCase {
    /// `None` means no generation backend: every expert gets mock text.
    pub fn new(generator: Option<Arc<dyn TextGenerator>>) -> Self {
        Self {
            generator,
            progress: Arc::new(NoProgress),
            conversation_logger: Arc::new(NoConversationLogger),
        }
    }

    pub fn with_progress(mut self, progress: Arc<dyn ProgressNotifier>) -> Self {
        self.progress = progress;
        self
    }

    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.conversation_logger = logger;
        self
    }

    pub fn has_backend(&self) -> bool {
        self.generator.is_some()
    }

    /// Run every expert and return the batch outcome.
    ///
    /// Never fails: the outcome always holds exactly one result per expert.
    pub async fn execute(&self, input: RunExpertsInput) -> BatchOutcome {
        let RunExpertsInput {
            task,
            recorder_enabled,
            params,
        } = input;
        let roles = ExpertRole::roster(recorder_enabled);
        let started = Instant::now();
        let ctx = ExecutionContext::new(
            CancellationToken::new(),
            deadline_after(started, params.batch_timeout),
        );

        info!(
            "Dispatching {} experts (timeout {:?}, backend: {})",
            roles.len(),
            params.batch_timeout,
            if self.has_backend() { "live" } else { "none" }
        );
        self.progress.on_batch_start(&roles);
        self.conversation_logger.log(ConversationEvent::new(
            "batch_started",
            serde_json::json!({
                "task": task.description(),
                "roles": roles.iter().map(|r| r.as_str()).collect::<Vec<_>>(),
                "timeout_ms": params.batch_timeout.as_millis() as u64,
            }),
        ));

        let mut join_set = JoinSet::new();
        let mut pending: BTreeSet<ExpertRole> = BTreeSet::new();
        for &role in &roles {
            let unit = AgentUnit::new(
                role,
                task.clone(),
                self.generator.clone(),
                params.clone(),
                Arc::clone(&self.progress),
                Arc::clone(&self.conversation_logger),
            );
            let ctx = ctx.clone();
            pending.insert(role);
            join_set.spawn(async move { unit.execute(&ctx).await });
        }

        let mut results = Vec::with_capacity(roles.len());
        let deadline = sleep_until(ctx.deadline());
        tokio::pin!(deadline);
        let mut deadline_hit = false;

        loop {
            tokio::select! {
                biased;
                joined = join_set.join_next() => match joined {
                    Some(Ok(result)) => {
                        pending.remove(&result.role);
                        self.record(&result);
                        results.push(result);
                    }
                    Some(Err(e)) => warn!("Expert task failed to join: {}", e),
                    None => break,
                },
                _ = &mut deadline => {
                    deadline_hit = true;
                    break;
                }
            }
        }

        if deadline_hit {
            warn!(
                "Batch deadline of {:?} reached with {} expert(s) pending",
                params.batch_timeout,
                pending.len()
            );
            ctx.cancel();
            join_set.shutdown().await;
        }

        // Experts still pending here timed out (or crashed): whatever they
        // return after cancellation is discarded by `shutdown`.
        for role in pending {
            let result = if deadline_hit {
                ExecutionResult::timed_out(role, &task, params.batch_timeout)
            } else {
                ExecutionResult::crashed(role, &task, started.elapsed())
            };
            self.record(&result);
            results.push(result);
        }

        let elapsed = started.elapsed();
        let outcome = if self.has_backend() {
            BatchOutcome::from_results(task, results, elapsed, params.policy)
        } else {
            BatchOutcome::unavailable(task, &roles, elapsed)
        };

        if let Some(cause) = &outcome.degradation {
            warn!("Batch degraded to mock output: {}", cause);
        }
        info!(
            mode = %outcome.mode,
            failures = outcome.failures,
            "Batch finished in {:.2}s",
            elapsed.as_secs_f64()
        );
        self.conversation_logger.log(ConversationEvent::new(
            "batch_completed",
            serde_json::json!({
                "mode": outcome.mode.as_str(),
                "failures": outcome.failures,
                "degradation": outcome.degradation,
                "elapsed_ms": elapsed.as_millis() as u64,
            }),
        ));
        self.progress.on_batch_complete(&outcome);
        outcome
    }

    fn record(&self, result: &ExecutionResult) {
        debug!(role = %result.role, status = %result.status, "Expert reported");
        self.progress.on_expert_complete(result);
        self.conversation_logger.log(ConversationEvent::new(
            "expert_result",
            serde_json::json!({
                "role": result.role.as_str(),
                "status": result.status.as_str(),
                "attempts": result.attempts,
                "failure": result.failure,
                "text": result.text,
            }),
        ));
    }
}
