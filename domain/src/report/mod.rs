//! Report domain
//!
//! Presentation-ready view of a [`BatchOutcome`](crate::BatchOutcome).

mod builder;

pub use builder::{DEFAULT_DISPLAY_LIMIT, Report, ReportBuilder, ReportEntry};
