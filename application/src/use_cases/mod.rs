//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod agent_unit;
pub mod run_experts;
