//! Agent unit
//!
//! One expert's generation call, retried with exponential backoff until it
//! succeeds, the retry budget runs out, or the batch is cancelled. Whatever
//! happens, [`AgentUnit::execute`] returns an [`ExecutionResult`].

use crate::config::BatchParams;
use crate::ports::conversation_logger::{ConversationEvent, ConversationLogger};
use crate::ports::generation::{Generation, GenerationError, GenerationRequest, TextGenerator};
use crate::ports::progress::ProgressNotifier;
use shokunin_domain::{
    AttemptOutcome, AttemptRecord, ExecutionResult, ExpertProfile, ExpertRole, Task, TokenUsage,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{Instant, sleep_until};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Far-future stand-in for deadlines that overflow [`Instant`]
const FAR_FUTURE: Duration = Duration::from_secs(86400 * 365 * 30);

/// `start + timeout`, saturating instead of panicking on overflow
pub(crate) fn deadline_after(start: Instant, timeout: Duration) -> Instant {
    start
        .checked_add(timeout)
        .unwrap_or_else(|| start + FAR_FUTURE)
}

/// Deadline and cancellation signal shared by every unit of a batch
///
/// The deadline is enforced by the owner of the context: it cancels the
/// token once the deadline passes. Units only observe the token, so the
/// owner alone decides which experts timed out.
#[derive(Debug, Clone)]
pub struct ExecutionContext {
    token: CancellationToken,
    deadline: Instant,
}

impl ExecutionContext {
    pub fn new(token: CancellationToken, deadline: Instant) -> Self {
        Self { token, deadline }
    }

    /// Context whose deadline is `timeout` from now
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::new(CancellationToken::new(), deadline_after(Instant::now(), timeout))
    }

    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Sleep for `duration`, waking early on cancellation.
    ///
    /// Returns `true` only if the full duration elapsed.
    pub async fn sleep(&self, duration: Duration) -> bool {
        if self.is_cancelled() {
            return false;
        }
        let wake_at = deadline_after(Instant::now(), duration);
        tokio::select! {
            biased;
            _ = self.token.cancelled() => false,
            _ = sleep_until(wake_at) => true,
        }
    }
}

/// One expert of the batch
///
/// Created fresh for every run and consumed by [`execute`](Self::execute).
pub struct AgentUnit {
    role: ExpertRole,
    task: Task,
    generator: Option<Arc<dyn TextGenerator>>,
    params: BatchParams,
    progress: Arc<dyn ProgressNotifier>,
    conversation_logger: Arc<dyn ConversationLogger>,
}

impl AgentUnit {
    pub fn new(
        role: ExpertRole,
        task: Task,
        generator: Option<Arc<dyn TextGenerator>>,
        params: BatchParams,
        progress: Arc<dyn ProgressNotifier>,
        conversation_logger: Arc<dyn ConversationLogger>,
    ) -> Self {
        Self {
            role,
            task,
            generator,
            params,
            progress,
            conversation_logger,
        }
    }

    pub fn role(&self) -> ExpertRole {
        self.role
    }

    /// Prompts for this expert. Pure.
    pub fn request(&self) -> GenerationRequest {
        let profile = ExpertProfile::for_role(self.role);
        GenerationRequest::new(profile.system_prompt(), profile.user_prompt(&self.task))
    }

    /// Run the retry loop and produce the expert's final result
    pub async fn execute(&self, ctx: &ExecutionContext) -> ExecutionResult {
        let Some(generator) = self.generator.as_ref() else {
            debug!(role = %self.role, "No generation backend, using mock text");
            return ExecutionResult::mock(self.role, &self.task);
        };

        let request = self.request();
        let started = Instant::now();
        let max_attempts = self.params.effective_attempts();
        let mut usage = TokenUsage::default();
        let mut index = 0;

        loop {
            let attempt_started = Instant::now();
            let outcome = match self.attempt(generator.as_ref(), &request, ctx).await {
                Ok(generation) => {
                    usage += generation.usage;
                    AttemptOutcome::Success(generation.text)
                }
                Err(e) => AttemptOutcome::Error {
                    cause: e.cause(),
                    message: e.to_string(),
                },
            };
            let mut record = AttemptRecord::new(index, outcome, attempt_started.elapsed());
            self.log_attempt(&record);

            let is_last = record.outcome.is_success()
                || record.attempt_count() >= max_attempts
                || ctx.is_cancelled();
            if is_last {
                return self.finish(record, started, usage);
            }

            let backoff = self.params.backoff_for(index);
            record = record.with_backoff(backoff);
            if let AttemptOutcome::Error { message, .. } = &record.outcome {
                warn!(
                    role = %self.role,
                    attempt = record.attempt_count(),
                    "Generation failed: {}, retrying in {:?}",
                    message,
                    backoff
                );
            }
            self.progress.on_retry_scheduled(self.role, &record);

            if !ctx.sleep(backoff).await {
                debug!(role = %self.role, "Cancelled during backoff");
                return self.finish(record, started, usage);
            }
            index += 1;
        }
    }

    /// Single generation call raced against cancellation and the
    /// per-attempt limit
    async fn attempt(
        &self,
        generator: &dyn TextGenerator,
        request: &GenerationRequest,
        ctx: &ExecutionContext,
    ) -> Result<Generation, GenerationError> {
        let limit = self.params.attempt_timeout;
        let expiry = async move {
            match limit {
                Some(limit) => sleep_until(deadline_after(Instant::now(), limit)).await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            biased;
            _ = ctx.token().cancelled() => Err(GenerationError::Cancelled),
            _ = expiry => Err(GenerationError::Timeout),
            result = generator.generate(request) => result,
        }
    }

    fn finish(&self, last: AttemptRecord, started: Instant, usage: TokenUsage) -> ExecutionResult {
        let result =
            ExecutionResult::from_last_attempt(self.role, &self.task, last, started.elapsed(), usage);
        info!(
            role = %self.role,
            status = %result.status,
            attempts = result.attempts,
            "Expert finished"
        );
        result
    }

    fn log_attempt(&self, record: &AttemptRecord) {
        let (success, error) = match &record.outcome {
            AttemptOutcome::Success(_) => (true, None),
            AttemptOutcome::Error { message, .. } => (false, Some(message.as_str())),
        };
        self.conversation_logger.log(ConversationEvent::new(
            "generation_attempt",
            serde_json::json!({
                "role": self.role.as_str(),
                "attempt": record.attempt_count(),
                "success": success,
                "error": error,
                "elapsed_ms": record.elapsed.as_millis() as u64,
            }),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::conversation_logger::NoConversationLogger;
    use crate::ports::progress::NoProgress;
    use async_trait::async_trait;
    use shokunin_domain::{BatchOutcome, ExecutionStatus, FailureCause, FallbackText};
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicU32, Ordering};

    // ==================== Test Mocks ====================

    struct AlwaysFails {
        calls: AtomicU32,
    }

    #[async_trait]
    impl TextGenerator for AlwaysFails {
        async fn generate(
            &self,
            _request: &GenerationRequest,
        ) -> Result<Generation, GenerationError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(GenerationError::Transport("connection refused".to_string()))
        }
    }

    /// Fails `failures` times, then succeeds
    struct Flaky {
        failures: u32,
        calls: AtomicU32,
    }

    #[async_trait]
    impl TextGenerator for Flaky {
        async fn generate(
            &self,
            request: &GenerationRequest,
        ) -> Result<Generation, GenerationError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call < self.failures {
                return Err(GenerationError::Rejected {
                    status: 529,
                    message: "overloaded".to_string(),
                });
            }
            Ok(Generation::new(format!("answer to {}", request.user_prompt.len()))
                .with_usage(TokenUsage::new(7, 11)))
        }
    }

    struct NeverReturns;

    #[async_trait]
    impl TextGenerator for NeverReturns {
        async fn generate(
            &self,
            _request: &GenerationRequest,
        ) -> Result<Generation, GenerationError> {
            std::future::pending().await
        }
    }

    #[derive(Default)]
    struct RecordingProgress {
        retries: Mutex<Vec<(ExpertRole, AttemptRecord)>>,
    }

    impl ProgressNotifier for RecordingProgress {
        fn on_batch_start(&self, _roles: &[ExpertRole]) {}

        fn on_retry_scheduled(&self, role: ExpertRole, attempt: &AttemptRecord) {
            self.retries.lock().unwrap().push((role, attempt.clone()));
        }

        fn on_expert_complete(&self, _result: &ExecutionResult) {}
        fn on_batch_complete(&self, _outcome: &BatchOutcome) {}
    }

    fn task() -> Task {
        Task::new("build a blog system")
    }

    fn params() -> BatchParams {
        BatchParams::default()
            .with_batch_timeout(Duration::from_secs(5))
            .with_backoff_unit(Duration::from_millis(5))
    }

    fn unit(
        role: ExpertRole,
        generator: Option<Arc<dyn TextGenerator>>,
        progress: Arc<dyn ProgressNotifier>,
    ) -> AgentUnit {
        AgentUnit::new(
            role,
            task(),
            generator,
            params(),
            progress,
            Arc::new(NoConversationLogger),
        )
    }

    // ==================== Tests ====================

    #[test]
    fn test_request_is_deterministic() {
        let unit = unit(ExpertRole::Design, None, Arc::new(NoProgress));
        let first = unit.request();
        let second = unit.request();
        assert_eq!(first, second);
        assert!(first.user_prompt.contains("build a blog system"));
    }

    #[tokio::test]
    async fn test_retry_bound_and_exponential_backoff() {
        let generator = Arc::new(AlwaysFails {
            calls: AtomicU32::new(0),
        });
        let progress = Arc::new(RecordingProgress::default());
        let unit = unit(
            ExpertRole::Developer,
            Some(generator.clone()),
            progress.clone(),
        );

        let started = std::time::Instant::now();
        let result = unit.execute(&ExecutionContext::with_timeout(Duration::from_secs(5))).await;

        assert_eq!(generator.calls.load(Ordering::SeqCst), 3);
        assert_eq!(result.status, ExecutionStatus::Failed);
        assert_eq!(result.attempts, 3);
        assert_eq!(result.failure, Some(FailureCause::TransportFailure));
        assert_eq!(
            result.text,
            FallbackText::after_failure(ExpertRole::Developer, &task(), 3)
        );

        let retries = progress.retries.lock().unwrap();
        let backoffs: Vec<_> = retries.iter().filter_map(|(_, r)| r.backoff).collect();
        assert_eq!(backoffs.len(), 2);
        assert!(backoffs[1] >= backoffs[0] * 2);
        assert!(started.elapsed() >= backoffs[0] + backoffs[1]);
    }

    #[tokio::test]
    async fn test_flaky_generator_recovers() {
        let generator = Arc::new(Flaky {
            failures: 1,
            calls: AtomicU32::new(0),
        });
        let unit = unit(ExpertRole::Quality, Some(generator), Arc::new(NoProgress));

        let result = unit.execute(&ExecutionContext::with_timeout(Duration::from_secs(5))).await;

        assert_eq!(result.status, ExecutionStatus::Succeeded);
        assert_eq!(result.attempts, 2);
        assert!(result.text.starts_with("answer to "));
        assert_eq!(result.usage, TokenUsage::new(7, 11));
    }

    #[tokio::test]
    async fn test_missing_backend_short_circuits() {
        let progress = Arc::new(RecordingProgress::default());
        let unit = unit(ExpertRole::Recorder, None, progress.clone());

        let result = unit.execute(&ExecutionContext::with_timeout(Duration::from_secs(5))).await;

        assert_eq!(result.status, ExecutionStatus::FellBackToMock);
        assert_eq!(result.attempts, 0);
        assert_eq!(result.text, FallbackText::mock(ExpertRole::Recorder, &task()));
        assert!(progress.retries.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_cancelled_context_skips_backoff() {
        let generator = Arc::new(AlwaysFails {
            calls: AtomicU32::new(0),
        });
        let progress = Arc::new(RecordingProgress::default());
        let unit = unit(ExpertRole::Design, Some(generator.clone()), progress.clone());

        let ctx = ExecutionContext::with_timeout(Duration::from_secs(5));
        ctx.cancel();
        let result = unit.execute(&ctx).await;

        assert!(result.is_failed());
        assert_eq!(result.attempts, 1);
        assert_eq!(result.failure, Some(FailureCause::Timeout));
        assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
        assert!(progress.retries.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_cancellation_wakes_backoff_sleep() {
        let ctx = ExecutionContext::with_timeout(Duration::from_secs(60));
        let canceller = ctx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            canceller.cancel();
        });

        let started = std::time::Instant::now();
        let slept = ctx.sleep(Duration::from_secs(30)).await;

        assert!(!slept);
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_attempt_timeout_interrupts_hanging_call() {
        let unit = AgentUnit::new(
            ExpertRole::Optimization,
            task(),
            Some(Arc::new(NeverReturns)),
            params().with_attempt_timeout(Some(Duration::from_millis(20))),
            Arc::new(NoProgress),
            Arc::new(NoConversationLogger),
        );

        let result = unit
            .execute(&ExecutionContext::with_timeout(Duration::from_secs(5)))
            .await;

        assert!(result.is_failed());
        assert_eq!(result.failure, Some(FailureCause::Timeout));
        assert_eq!(result.attempts, 3);
    }

    #[tokio::test]
    async fn test_unit_leaves_deadline_to_owner() {
        // An expired deadline without cancellation does not stop the unit
        let ctx = ExecutionContext::new(CancellationToken::new(), Instant::now());
        let generator = Arc::new(Flaky {
            failures: 0,
            calls: AtomicU32::new(0),
        });
        let unit = unit(ExpertRole::Design, Some(generator), Arc::new(NoProgress));

        let result = unit.execute(&ctx).await;

        assert_eq!(result.status, ExecutionStatus::Succeeded);
        assert_eq!(result.attempts, 1);
    }

    #[tokio::test]
    async fn test_huge_timeout_does_not_overflow() {
        let ctx = ExecutionContext::with_timeout(Duration::MAX);
        assert!(ctx.deadline() > Instant::now());

        let unit = unit(
            ExpertRole::Developer,
            Some(Arc::new(Flaky {
                failures: 0,
                calls: AtomicU32::new(0),
            })),
            Arc::new(NoProgress),
        );
        let result = unit.execute(&ctx).await;
        assert_eq!(result.status, ExecutionStatus::Succeeded);
    }
}
