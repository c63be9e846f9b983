//! Expert council domain
//!
//! The closed set of expert roles that answer a task, their prompt
//! configuration, and the deterministic text used when real output is
//! not available.

pub mod fallback;
pub mod profile;
pub mod role;
