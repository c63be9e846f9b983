//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

mod orchestration;
mod output;
mod providers;

pub use orchestration::FileOrchestrationConfig;
pub use output::{FileOutputConfig, FileOutputFormat};
pub use providers::{FileAnthropicConfig, FileProvidersConfig};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigValidationError {
    #[error("orchestration.timeout_seconds must be a positive number (got {0})")]
    InvalidTimeout(f64),

    #[error("orchestration.attempt_timeout_seconds must be a positive number (got {0})")]
    InvalidAttemptTimeout(f64),

    #[error("orchestration.max_attempts cannot be 0")]
    ZeroAttempts,

    #[error("providers.anthropic.model cannot be empty")]
    EmptyModelName,

    #[error("providers.anthropic.max_tokens cannot be 0")]
    ZeroMaxTokens,
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Batch deadline, retries and recorder toggle
    pub orchestration: FileOrchestrationConfig,
    /// Generation backend settings
    pub providers: FileProvidersConfig,
    /// Output settings
    pub output: FileOutputConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning every problem found.
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut errors = Vec::new();

        let timeout = self.orchestration.timeout_seconds;
        if !timeout.is_finite() || timeout <= 0.0 {
            errors.push(ConfigValidationError::InvalidTimeout(timeout));
        }
        if let Some(limit) = self.orchestration.attempt_timeout_seconds {
            if !limit.is_finite() || limit <= 0.0 {
                errors.push(ConfigValidationError::InvalidAttemptTimeout(limit));
            }
        }
        if self.orchestration.max_attempts == 0 {
            errors.push(ConfigValidationError::ZeroAttempts);
        }
        if self.providers.anthropic.model.trim().is_empty() {
            errors.push(ConfigValidationError::EmptyModelName);
        }
        if self.providers.anthropic.max_tokens == 0 {
            errors.push(ConfigValidationError::ZeroMaxTokens);
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shokunin_domain::OutputFormat;

    #[test]
    fn test_deserialize_full_config() {
        let toml_str = r#"
[orchestration]
timeout_seconds = 30
enable_recorder = false
max_attempts = 5
backoff_unit_ms = 250

[providers.anthropic]
model = "claude-3-5-haiku-20241022"
max_tokens = 2000

[output]
format = "json"
color = false
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.orchestration.timeout_seconds, 30.0);
        assert!(!config.orchestration.enable_recorder);
        assert_eq!(config.orchestration.max_attempts, 5);
        assert_eq!(config.orchestration.backoff_unit_ms, 250);
        assert_eq!(config.providers.anthropic.model, "claude-3-5-haiku-20241022");
        assert_eq!(config.providers.anthropic.max_tokens, 2000);
        assert_eq!(config.output.format, Some(OutputFormat::Json));
        assert!(!config.output.color);
    }

    #[test]
    fn test_deserialize_partial_config() {
        let toml_str = r#"
[orchestration]
timeout_seconds = 0.5
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.orchestration.timeout_seconds, 0.5);
        // Defaults should apply
        assert!(config.orchestration.enable_recorder);
        assert_eq!(config.orchestration.max_attempts, 3);
        assert_eq!(
            config.providers.anthropic.api_key_env,
            "ANTHROPIC_API_KEY"
        );
        assert!(config.output.color);
    }

    #[test]
    fn test_validate_valid_config() {
        let config = FileConfig::default();
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_validate_reports_every_problem() {
        let mut config = FileConfig::default();
        config.orchestration.timeout_seconds = 0.0;
        config.orchestration.max_attempts = 0;
        config.providers.anthropic.model = "  ".to_string();

        let errors = config.validate();
        assert_eq!(
            errors,
            vec![
                ConfigValidationError::InvalidTimeout(0.0),
                ConfigValidationError::ZeroAttempts,
                ConfigValidationError::EmptyModelName,
            ]
        );
    }

    #[test]
    fn test_validate_rejects_non_finite_timeouts() {
        let mut config = FileConfig::default();
        config.orchestration.timeout_seconds = f64::INFINITY;
        config.orchestration.attempt_timeout_seconds = Some(-1.0);

        let errors = config.validate();
        assert_eq!(
            errors,
            vec![
                ConfigValidationError::InvalidTimeout(f64::INFINITY),
                ConfigValidationError::InvalidAttemptTimeout(-1.0),
            ]
        );
    }

    #[test]
    fn test_validate_accepts_huge_timeout() {
        let mut config = FileConfig::default();
        config.orchestration.timeout_seconds = 1e20;
        assert!(config.validate().is_empty());
    }
}
