//! Domain layer for pdca-shokunin
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Expert council
//!
//! A [`Task`] is answered by a fixed set of experts ([`ExpertRole`]): Design,
//! Developer, Quality and Optimization, plus an optional Recorder. Each
//! expert produces one [`ExecutionResult`].
//!
//! ## Batch degradation
//!
//! The results of one task form a [`BatchOutcome`]. When too many experts
//! fail ([`DegradationPolicy`]), the whole batch is replaced by deterministic
//! mock output ([`ExecutionMode::MockSimulation`]), successes included.
//!
//! ## Reports
//!
//! [`ReportBuilder`] turns an outcome into a [`Report`] with a summary line
//! and display-truncated text.

pub mod config;
pub mod core;
pub mod expert;
pub mod orchestration;
pub mod prompt;
pub mod report;

// Re-export commonly used types
pub use config::OutputFormat;
pub use core::{error::FailureCause, string::truncate_chars, task::Task};
pub use expert::{
    fallback::FallbackText,
    profile::{ExpertProfile, PROFILES},
    role::ExpertRole,
};
pub use orchestration::{
    entities::{BatchOutcome, DegradationCause, ExecutionMode},
    policy::DegradationPolicy,
    value_objects::{AttemptOutcome, AttemptRecord, ExecutionResult, ExecutionStatus, TokenUsage},
};
pub use prompt::PromptTemplate;
pub use report::{DEFAULT_DISPLAY_LIMIT, Report, ReportBuilder, ReportEntry};
