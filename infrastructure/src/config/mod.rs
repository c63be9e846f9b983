//! Configuration file loading for pdca-shokunin
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `PDCA_`-prefixed environment variables (`PDCA_ORCHESTRATION__TIMEOUT_SECONDS=30`)
//! 2. `--config <path>` specified file
//! 3. Project root: `./pdca.toml` or `./.pdca.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/pdca-shokunin/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, FileAnthropicConfig, FileConfig, FileOrchestrationConfig,
    FileOutputConfig, FileOutputFormat, FileProvidersConfig,
};
pub use loader::ConfigLoader;
