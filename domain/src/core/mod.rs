//! Core domain concepts shared across all subdomains.
//!
//! - [`task::Task`] - the job description handed to every expert
//! - [`error::FailureCause`] - why an expert failed to produce real output
//! - [`string::truncate_chars`] - display truncation helper

pub mod error;
pub mod string;
pub mod task;
