//! Batch orchestration domain
//!
//! Per-expert results, the batch outcome and the policy that decides
//! when a batch degrades to mock output.

pub mod entities;
pub mod policy;
pub mod value_objects;
