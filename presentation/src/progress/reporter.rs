//! Progress reporting while the experts run

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use shokunin_application::ports::progress::ProgressNotifier;
use shokunin_domain::{AttemptRecord, BatchOutcome, ExecutionResult, ExecutionStatus, ExpertRole};
use std::sync::Mutex;

/// Reports progress with an indicatif bar
pub struct ProgressReporter {
    bar: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            bar: Mutex::new(None),
        }
    }

    fn batch_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }

    fn with_bar(&self, f: impl FnOnce(&ProgressBar)) {
        if let Ok(guard) = self.bar.lock()
            && let Some(bar) = guard.as_ref()
        {
            f(bar);
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressNotifier for ProgressReporter {
    fn on_batch_start(&self, roles: &[ExpertRole]) {
        let bar = ProgressBar::new(roles.len() as u64);
        bar.set_style(Self::batch_style());
        bar.set_prefix("Experts");
        bar.set_message("Dispatching...");
        bar.enable_steady_tick(std::time::Duration::from_millis(120));

        if let Ok(mut guard) = self.bar.lock() {
            *guard = Some(bar);
        }
    }

    fn on_retry_scheduled(&self, role: ExpertRole, attempt: &AttemptRecord) {
        self.with_bar(|bar| {
            bar.set_message(format!(
                "{} {} retrying (attempt {} failed)",
                "!".yellow(),
                role,
                attempt.attempt_count()
            ));
        });
    }

    fn on_expert_complete(&self, result: &ExecutionResult) {
        self.with_bar(|bar| {
            bar.set_message(format!("{} {}", SimpleProgress::mark(result.status), result.role));
            bar.inc(1);
        });
    }

    fn on_batch_complete(&self, outcome: &BatchOutcome) {
        if let Ok(mut guard) = self.bar.lock()
            && let Some(bar) = guard.take()
        {
            bar.finish_with_message(format!("{} ({})", "complete!".green(), outcome.mode));
        }
    }
}

/// Simple text-based progress (no fancy UI)
pub struct SimpleProgress;

impl SimpleProgress {
    fn mark(status: ExecutionStatus) -> colored::ColoredString {
        match status {
            ExecutionStatus::Succeeded => "v".green(),
            ExecutionStatus::Failed => "x".red(),
            ExecutionStatus::FellBackToMock => "~".yellow(),
        }
    }
}

impl ProgressNotifier for SimpleProgress {
    fn on_batch_start(&self, roles: &[ExpertRole]) {
        eprintln!(
            "{} {} ({} experts)",
            "->".cyan(),
            "Dispatching council".bold(),
            roles.len()
        );
    }

    fn on_retry_scheduled(&self, role: ExpertRole, attempt: &AttemptRecord) {
        if let Some(backoff) = attempt.backoff {
            eprintln!(
                "  {} {} attempt {} failed, retrying in {:.1}s",
                "!".yellow(),
                role,
                attempt.attempt_count(),
                backoff.as_secs_f64()
            );
        }
    }

    fn on_expert_complete(&self, result: &ExecutionResult) {
        eprintln!("  {} {} ({})", Self::mark(result.status), result.role, result.status);
    }

    fn on_batch_complete(&self, outcome: &BatchOutcome) {
        if let Some(cause) = &outcome.degradation {
            eprintln!("  {} degraded: {}", "~".yellow(), cause);
        }
        eprintln!();
    }
}
