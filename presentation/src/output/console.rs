//! Console output formatter for council reports

use colored::{ColoredString, Colorize};
use shokunin_domain::{ExecutionMode, ExecutionStatus, OutputFormat, Report, ReportEntry};

/// Formats council reports for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Render the report in the requested format
    pub fn render(report: &Report, format: OutputFormat) -> String {
        match format {
            OutputFormat::Full => Self::format(report),
            OutputFormat::Summary => Self::format_summary(report),
            OutputFormat::Json => Self::format_json(report),
        }
    }

    /// Format the complete report
    pub fn format(report: &Report) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("Expert Council Report"));
        output.push('\n');

        output.push_str(&format!("{} {}\n", "Task:".cyan().bold(), report.task));
        output.push_str(&Self::mode_line(report));
        output.push('\n');

        output.push_str(&Self::section_header("Expert Results"));
        for entry in &report.results {
            output.push_str(&format!("\n{}\n", Self::entry_title(entry)));
            output.push_str(&Self::indent(&entry.display_text, "  "));
            output.push('\n');
            if entry.is_truncated() {
                output.push_str(&format!(
                    "  {}\n",
                    format!("({} characters total)", entry.text.chars().count()).dimmed()
                ));
            }
        }

        output.push_str(&Self::section_header("Summary"));
        output.push_str(&Self::summary_block(report));
        output.push_str(&Self::footer());

        output
    }

    /// Format as JSON
    pub fn format_json(report: &Report) -> String {
        serde_json::to_string_pretty(report).unwrap_or_else(|_| "{}".to_string())
    }

    /// Status line per expert and the summary (concise output)
    pub fn format_summary(report: &Report) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "{}\n\n",
            "=== Expert Council ===".cyan().bold()
        ));
        output.push_str(&format!("{} {}\n", "Task:".bold(), report.task));
        output.push_str(&Self::mode_line(report));
        output.push('\n');

        for entry in &report.results {
            output.push_str(&format!(
                "  {} {:<13} {} ({} attempt{})\n",
                Self::status_mark(entry.status),
                entry.role.as_str(),
                entry.status.as_str().dimmed(),
                entry.attempts,
                if entry.attempts == 1 { "" } else { "s" }
            ));
        }
        output.push('\n');
        output.push_str(&Self::summary_block(report));

        output
    }

    fn mode_line(report: &Report) -> String {
        let mode = match report.mode {
            ExecutionMode::RealParallel => report.mode.as_str().green(),
            ExecutionMode::MockSimulation => report.mode.as_str().yellow(),
        };
        let mut line = format!("{} {}", "Mode:".cyan().bold(), mode);
        if let Some(cause) = &report.degradation {
            line.push_str(&format!(" {}", format!("({})", cause).dimmed()));
        }
        line.push('\n');
        line
    }

    fn entry_title(entry: &ReportEntry) -> String {
        let title = format!(
            "{} {} [{}]",
            entry.role.icon(),
            entry.role.display_name(),
            entry.status
        );
        let title = match entry.status {
            ExecutionStatus::Succeeded => title.green().bold(),
            ExecutionStatus::Failed => title.red().bold(),
            ExecutionStatus::FellBackToMock => title.yellow().bold(),
        };
        format!("── {} ──", title)
    }

    fn status_mark(status: ExecutionStatus) -> ColoredString {
        match status {
            ExecutionStatus::Succeeded => "v".green(),
            ExecutionStatus::Failed => "x".red(),
            ExecutionStatus::FellBackToMock => "~".yellow(),
        }
    }

    fn summary_block(report: &Report) -> String {
        let mut block = format!(
            "{} {} in {:.2}s\n",
            "Summary:".cyan().bold(),
            report.summary,
            report.execution_time_seconds
        );
        if report.failures > 0 {
            block.push_str(&format!(
                "{} {}\n",
                "Failures:".red().bold(),
                report.failures
            ));
        }
        if !report.token_usage.is_empty() {
            block.push_str(&format!(
                "{} {}\n",
                "Usage:".dimmed(),
                report.token_usage
            ));
        }
        block
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
