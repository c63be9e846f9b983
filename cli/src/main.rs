//! CLI entrypoint for pdca-shokunin
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::Parser;
use shokunin_application::{
    ConversationLogger, NoConversationLogger, NoProgress, ProgressNotifier, RunExpertsInput,
    RunExpertsUseCase, TaskStatusRecord, TaskStatusStore, TextGenerator,
};
use shokunin_domain::{OutputFormat, PromptTemplate, ReportBuilder, Task};
use shokunin_infrastructure::{
    AnthropicGenerator, ConfigLoader, FileConfig, JsonTaskStatusStore, JsonlConversationLogger,
};
use shokunin_presentation::{Cli, ConsoleFormatter, ProgressReporter, SimpleProgress};
use std::io::IsTerminal;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let _log_guard = init_logging(&cli)?;

    if cli.show_config {
        ConfigLoader::print_config_sources();
        return Ok(());
    }

    if let Some(topic) = &cli.recorder_prompt {
        println!("{}", PromptTemplate::recorder_analysis(topic));
        return Ok(());
    }

    let status_store = JsonTaskStatusStore::default();
    if cli.status {
        match status_store.load()? {
            Some(record) => {
                println!("Task:    {}", record.task);
                println!("Created: {}", record.created_at.to_rfc3339());
                println!("Status:  {}", record.status);
                println!("Mode:    {}", record.mode);
                println!("Source:  {}", record.source);
            }
            None => println!("No task has been executed yet."),
        }
        return Ok(());
    }

    let Some(task) = cli.task_text().and_then(Task::try_new) else {
        bail!("Please provide a task description, e.g. pdca \"build a blog system\"");
    };

    // Load configuration
    let mut config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_deref())
            .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?
    };
    if let Some(timeout) = cli.timeout {
        config.orchestration.timeout_seconds = timeout;
    }
    let issues = config.validate();
    for issue in &issues {
        warn!("Invalid configuration: {}", issue);
    }
    if !issues.is_empty() {
        bail!("Configuration has {} problem(s), see warnings above", issues.len());
    }

    if !config.output.color {
        colored::control::set_override(false);
    }
    let format: OutputFormat = cli
        .output
        .map(Into::into)
        .or(config.output.format)
        .unwrap_or_default();

    // === Dependency Injection ===
    let generator = build_generator(&config);
    let params = config.orchestration.to_batch_params();
    let recorder_enabled = config.orchestration.enable_recorder && !cli.no_recorder;

    let progress: Arc<dyn ProgressNotifier> = if cli.quiet || format == OutputFormat::Json {
        Arc::new(NoProgress)
    } else if std::io::stderr().is_terminal() {
        Arc::new(ProgressReporter::new())
    } else {
        Arc::new(SimpleProgress)
    };
    let conversation_logger: Arc<dyn ConversationLogger> = match &cli.conversation_log {
        Some(path) => match JsonlConversationLogger::new(path) {
            Some(logger) => Arc::new(logger),
            None => Arc::new(NoConversationLogger),
        },
        None => Arc::new(NoConversationLogger),
    };

    let use_case = RunExpertsUseCase::new(generator)
        .with_progress(progress)
        .with_conversation_logger(conversation_logger);
    let input = RunExpertsInput::new(task)
        .with_recorder(recorder_enabled)
        .with_params(params);

    let outcome = use_case.execute(input).await;
    let report = ReportBuilder::default().build(&outcome);

    println!("{}", ConsoleFormatter::render(&report, format));

    let record = TaskStatusRecord::from_outcome(&outcome, env!("CARGO_BIN_NAME"));
    if let Err(e) = status_store.save(&record) {
        warn!(
            "Could not save task status to {}: {}",
            status_store.path().display(),
            e
        );
    }

    Ok(())
}

/// Generation backend from config; `None` runs every expert on mock text
fn build_generator(config: &FileConfig) -> Option<Arc<dyn TextGenerator>> {
    let anthropic = &config.providers.anthropic;
    match AnthropicGenerator::try_new(anthropic) {
        Some(generator) => {
            info!("Using Anthropic model {}", generator.model());
            Some(Arc::new(generator))
        }
        None => {
            warn!(
                "No API key in ${} or config; experts will answer with mock text",
                anthropic.api_key_env
            );
            None
        }
    }
}

/// Install the tracing subscriber.
///
/// Verbosity picks the level (warn/info/debug/trace). With `--log-dir`
/// logs are also written to daily rolling files; the returned guard must
/// stay alive so buffered lines are flushed.
fn init_logging(cli: &Cli) -> Result<Option<WorkerGuard>> {
    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace", // -vvv or more
    };

    let console = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::new(level));

    let (file, guard) = match &cli.log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Cannot create log directory {}", dir.display()))?;
            let appender = tracing_appender::rolling::daily(dir, "pdca.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(writer)
                .with_filter(EnvFilter::new("debug"));
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(console)
        .with(file)
        .init();

    info!("Starting pdca-shokunin");
    Ok(guard)
}
