//! Application layer for pdca-shokunin
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::BatchParams;
pub use ports::{
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    generation::{Generation, GenerationError, GenerationRequest, TextGenerator},
    progress::{NoProgress, ProgressNotifier},
    status_store::{StatusStoreError, TaskStatusRecord, TaskStatusStore},
};
pub use use_cases::agent_unit::{AgentUnit, ExecutionContext};
pub use use_cases::run_experts::{RunExpertsInput, RunExpertsUseCase};
