//! Report output formatting

pub mod console;
