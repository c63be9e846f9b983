//! Infrastructure layer for pdca-shokunin
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod logging;
pub mod providers;
pub mod status;

// Re-export commonly used types
pub use config::{
    ConfigLoader, ConfigValidationError, FileAnthropicConfig, FileConfig,
    FileOrchestrationConfig, FileOutputConfig, FileOutputFormat, FileProvidersConfig,
};
pub use logging::JsonlConversationLogger;
pub use providers::{AnthropicGenerator, AnthropicSettings};
pub use status::{DEFAULT_STATUS_PATH, JsonTaskStatusStore};
