//! Provider configuration from TOML (`[providers]` section)

use serde::{Deserialize, Serialize};

/// Anthropic API provider configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAnthropicConfig {
    /// Environment variable name for the API key (default: "ANTHROPIC_API_KEY").
    pub api_key_env: String,
    /// Direct API key (not recommended, use the env var instead).
    pub api_key: Option<String>,
    /// Base URL for the Anthropic API.
    pub base_url: String,
    /// Model used by every expert.
    pub model: String,
    /// Max tokens per response.
    pub max_tokens: u32,
    /// Anthropic API version header.
    pub api_version: String,
    /// HTTP request timeout in seconds.
    pub request_timeout_seconds: u64,
}

impl Default for FileAnthropicConfig {
    fn default() -> Self {
        Self {
            api_key_env: "ANTHROPIC_API_KEY".to_string(),
            api_key: None,
            base_url: "https://api.anthropic.com".to_string(),
            model: "claude-3-5-sonnet-20241022".to_string(),
            max_tokens: 1000,
            api_version: "2023-06-01".to_string(),
            request_timeout_seconds: 60,
        }
    }
}

impl FileAnthropicConfig {
    /// API key from config, falling back to the configured env var.
    /// Blank keys count as missing.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var(&self.api_key_env).ok())
            .filter(|key| !key.trim().is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProvidersConfig {
    /// Anthropic API settings.
    pub anthropic: FileAnthropicConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_key_wins() {
        let config = FileAnthropicConfig {
            api_key: Some("sk-test".to_string()),
            api_key_env: "PDCA_TEST_KEY_THAT_IS_NEVER_SET".to_string(),
            ..Default::default()
        };
        assert_eq!(config.resolve_api_key(), Some("sk-test".to_string()));
    }

    #[test]
    fn test_missing_key() {
        let config = FileAnthropicConfig {
            api_key: None,
            api_key_env: "PDCA_TEST_KEY_THAT_IS_NEVER_SET".to_string(),
            ..Default::default()
        };
        assert_eq!(config.resolve_api_key(), None);
    }

    #[test]
    fn test_blank_key_is_missing() {
        let config = FileAnthropicConfig {
            api_key: Some("   ".to_string()),
            ..Default::default()
        };
        assert_eq!(config.resolve_api_key(), None);
    }
}
