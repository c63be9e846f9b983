//! Anthropic Messages API generator
//!
//! Sends each expert prompt as a single-turn `POST /v1/messages` request.
//! The client is stateless per call, so one instance serves every expert
//! of a batch concurrently.

use crate::config::FileAnthropicConfig;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use shokunin_application::{Generation, GenerationError, GenerationRequest, TextGenerator};
use shokunin_domain::TokenUsage;
use std::time::Duration;
use tracing::{debug, warn};

/// Connection settings for [`AnthropicGenerator`]
#[derive(Debug, Clone)]
pub struct AnthropicSettings {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub max_tokens: u32,
    pub api_version: String,
    pub request_timeout: Duration,
}

impl AnthropicSettings {
    /// Build settings from config; `None` when no API key is available.
    pub fn from_config(config: &FileAnthropicConfig) -> Option<Self> {
        let api_key = config.resolve_api_key()?;
        Some(Self {
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            api_version: config.api_version.clone(),
            request_timeout: Duration::from_secs(config.request_timeout_seconds.max(1)),
        })
    }

    fn messages_url(&self) -> String {
        format!("{}/v1/messages", self.base_url)
    }
}

// ─── Wire types ──────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: [UserMessage<'a>; 1],
}

#[derive(Debug, Serialize)]
struct UserMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ResponseBlock>,
    #[serde(default)]
    usage: Option<ResponseUsage>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ResponseBlock {
    Text { text: String },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
struct ResponseUsage {
    #[serde(default)]
    input_tokens: u64,
    #[serde(default)]
    output_tokens: u64,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

fn build_request<'a>(
    settings: &'a AnthropicSettings,
    request: &'a GenerationRequest,
) -> MessagesRequest<'a> {
    MessagesRequest {
        model: &settings.model,
        max_tokens: settings.max_tokens,
        system: &request.system_prompt,
        messages: [UserMessage {
            role: "user",
            content: &request.user_prompt,
        }],
    }
}

/// Concatenate the text blocks of a response body
fn parse_response(body: &str) -> Result<Generation, GenerationError> {
    let response: MessagesResponse = serde_json::from_str(body)
        .map_err(|e| GenerationError::MalformedResponse(e.to_string()))?;

    let text: String = response
        .content
        .into_iter()
        .filter_map(|block| match block {
            ResponseBlock::Text { text } => Some(text),
            ResponseBlock::Other => None,
        })
        .collect();

    if text.trim().is_empty() {
        return Err(GenerationError::MalformedResponse(
            "response contained no text".to_string(),
        ));
    }

    let usage = response
        .usage
        .map(|u| TokenUsage::new(u.input_tokens, u.output_tokens))
        .unwrap_or_default();
    Ok(Generation::new(text).with_usage(usage))
}

/// Prefer the API's own error message over the raw body
fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorResponse>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| body.trim().to_string())
}

// ─── Generator ───────────────────────────────────────────────────

/// [`TextGenerator`] backed by the Anthropic Messages API
pub struct AnthropicGenerator {
    http: reqwest::Client,
    settings: AnthropicSettings,
}

impl AnthropicGenerator {
    pub fn new(settings: AnthropicSettings) -> Result<Self, GenerationError> {
        let http = reqwest::Client::builder()
            .timeout(settings.request_timeout)
            .build()
            .map_err(|e| GenerationError::Unavailable(e.to_string()))?;
        Ok(Self { http, settings })
    }

    /// Build a generator from config.
    ///
    /// Returns `None` when no API key is configured or the HTTP client
    /// cannot be built; callers then run without a backend.
    pub fn try_new(config: &FileAnthropicConfig) -> Option<Self> {
        let settings = AnthropicSettings::from_config(config)?;
        match Self::new(settings) {
            Ok(generator) => Some(generator),
            Err(e) => {
                warn!("Anthropic client unavailable: {}", e);
                None
            }
        }
    }

    pub fn model(&self) -> &str {
        &self.settings.model
    }
}

#[async_trait]
impl TextGenerator for AnthropicGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<Generation, GenerationError> {
        let body = build_request(&self.settings, request);
        debug!(model = %self.settings.model, "POST {}", self.settings.messages_url());

        let response = self
            .http
            .post(self.settings.messages_url())
            .header("x-api-key", &self.settings.api_key)
            .header("anthropic-version", &self.settings.api_version)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GenerationError::Timeout
                } else {
                    GenerationError::Transport(e.to_string())
                }
            })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| GenerationError::Transport(e.to_string()))?;

        if !status.is_success() {
            return Err(GenerationError::Rejected {
                status: status.as_u16(),
                message: error_message(&text),
            });
        }

        parse_response(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> AnthropicSettings {
        AnthropicSettings {
            api_key: "sk-test".to_string(),
            base_url: "https://api.anthropic.com".to_string(),
            model: "claude-3-5-sonnet-20241022".to_string(),
            max_tokens: 1000,
            api_version: "2023-06-01".to_string(),
            request_timeout: Duration::from_secs(60),
        }
    }

    #[test]
    fn test_request_body_shape() {
        let settings = settings();
        let request = GenerationRequest::new("You are a design expert.", "Design a blog");
        let json = serde_json::to_value(build_request(&settings, &request)).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "model": "claude-3-5-sonnet-20241022",
                "max_tokens": 1000,
                "system": "You are a design expert.",
                "messages": [{"role": "user", "content": "Design a blog"}],
            })
        );
    }

    #[test]
    fn test_parse_text_and_usage() {
        let body = r#"{
            "id": "msg_01",
            "type": "message",
            "content": [
                {"type": "text", "text": "Layered "},
                {"type": "tool_use", "id": "t1", "name": "x", "input": {}},
                {"type": "text", "text": "architecture"}
            ],
            "usage": {"input_tokens": 12, "output_tokens": 30}
        }"#;

        let generation = parse_response(body).unwrap();
        assert_eq!(generation.text, "Layered architecture");
        assert_eq!(generation.usage, TokenUsage::new(12, 30));
    }

    #[test]
    fn test_parse_empty_content_is_malformed() {
        let err = parse_response(r#"{"content": []}"#).unwrap_err();
        assert!(matches!(err, GenerationError::MalformedResponse(_)));
    }

    #[test]
    fn test_parse_garbage_is_malformed() {
        let err = parse_response("<html>bad gateway</html>").unwrap_err();
        assert!(matches!(err, GenerationError::MalformedResponse(_)));
    }

    #[test]
    fn test_error_message_extraction() {
        let body = r#"{"type":"error","error":{"type":"overloaded_error","message":"Overloaded"}}"#;
        assert_eq!(error_message(body), "Overloaded");
        assert_eq!(error_message(" upstream reset \n"), "upstream reset");
    }

    #[test]
    fn test_settings_require_api_key() {
        let config = FileAnthropicConfig {
            api_key: None,
            api_key_env: "PDCA_TEST_KEY_THAT_IS_NEVER_SET".to_string(),
            ..Default::default()
        };
        assert!(AnthropicSettings::from_config(&config).is_none());
        assert!(AnthropicGenerator::try_new(&config).is_none());
    }

    #[test]
    fn test_settings_trim_base_url() {
        let config = FileAnthropicConfig {
            api_key: Some("sk-test".to_string()),
            base_url: "http://localhost:8080/".to_string(),
            ..Default::default()
        };
        let settings = AnthropicSettings::from_config(&config).unwrap();
        assert_eq!(settings.messages_url(), "http://localhost:8080/v1/messages");
    }
}
