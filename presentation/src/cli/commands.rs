//! CLI command definitions

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for council reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Every expert's text plus the summary
    Full,
    /// Status line per expert and the summary
    Summary,
    /// JSON report
    Json,
}

impl From<OutputFormat> for shokunin_domain::OutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Full => shokunin_domain::OutputFormat::Full,
            OutputFormat::Summary => shokunin_domain::OutputFormat::Summary,
            OutputFormat::Json => shokunin_domain::OutputFormat::Json,
        }
    }
}

/// CLI arguments for pdca-shokunin
#[derive(Parser, Debug)]
#[command(name = "pdca")]
#[command(author, version, about = "Expert council - specialist agents review one task in parallel")]
#[command(long_about = r#"
pdca dispatches a council of experts (Design, Developer, Quality,
Optimization and an optional Recorder) on one task, runs them in
parallel against the generation backend and prints a combined report.

If half of the experts (rounded up) fail or time out, the whole batch is
replaced by deterministic mock output. Without an API key every expert
answers with mock output immediately.

Configuration files are loaded from (in priority order):
1. PDCA_* environment variables
2. --config <path>     Explicit config file
3. ./pdca.toml         Project-level config
4. ~/.config/pdca-shokunin/config.toml   Global config

Example:
  pdca "build a blog system"
  pdca --no-recorder --timeout 30 -o summary "add full-text search"
  pdca --status
"#)]
pub struct Cli {
    /// The task for the council (words are joined with spaces)
    pub task: Vec<String>,

    /// Run without the Recorder expert
    #[arg(long)]
    pub no_recorder: bool,

    /// Batch deadline in seconds
    #[arg(short, long, value_name = "SECONDS")]
    pub timeout: Option<f64>,

    /// Output format
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,

    /// Show the last executed task and exit
    #[arg(long)]
    pub status: bool,

    /// Print the Recorder analysis prompt for a topic and exit
    #[arg(long, value_name = "TOPIC", num_args = 0..=1, default_missing_value = "")]
    pub recorder_prompt: Option<String>,

    /// Append structured batch events (JSONL) to this file
    #[arg(long, value_name = "PATH")]
    pub conversation_log: Option<PathBuf>,

    /// Also write diagnostic logs to daily files in this directory
    #[arg(long, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,
}

impl Cli {
    /// Task text from the positional words, `None` if blank
    pub fn task_text(&self) -> Option<String> {
        let text = self.task.join(" ");
        let text = text.trim();
        (!text.is_empty()).then(|| text.to_string())
    }
}
