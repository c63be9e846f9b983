//! Text generation port
//!
//! Defines the interface for the backend that turns an expert's prompts
//! into text. An absent backend is modelled as `Option<Arc<dyn TextGenerator>>`
//! being `None`, which sends the whole batch down the mock path.

use async_trait::async_trait;
use shokunin_domain::{FailureCause, TokenUsage};
use thiserror::Error;

/// Errors that can occur during a generation call
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Request rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Timeout")]
    Timeout,

    #[error("Cancelled")]
    Cancelled,

    #[error("Backend unavailable: {0}")]
    Unavailable(String),
}

impl GenerationError {
    /// Collapse the error into the cause recorded on the expert's result
    pub fn cause(&self) -> FailureCause {
        match self {
            GenerationError::Timeout | GenerationError::Cancelled => FailureCause::Timeout,
            GenerationError::Unavailable(_) => FailureCause::Unavailable,
            GenerationError::Transport(_)
            | GenerationError::Rejected { .. }
            | GenerationError::MalformedResponse(_) => FailureCause::TransportFailure,
        }
    }
}

/// Prompts for one generation call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub system_prompt: String,
    pub user_prompt: String,
}

impl GenerationRequest {
    pub fn new(system_prompt: impl Into<String>, user_prompt: impl Into<String>) -> Self {
        Self {
            system_prompt: system_prompt.into(),
            user_prompt: user_prompt.into(),
        }
    }
}

/// Text returned by the backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generation {
    pub text: String,
    pub usage: TokenUsage,
}

impl Generation {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            usage: TokenUsage::default(),
        }
    }

    pub fn with_usage(mut self, usage: TokenUsage) -> Self {
        self.usage = usage;
        self
    }
}

/// Backend that generates expert text
///
/// Implementations (adapters) live in the infrastructure layer. Callers
/// cancel an in-flight call by dropping the returned future.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate text for one expert prompt
    async fn generate(&self, request: &GenerationRequest) -> Result<Generation, GenerationError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_causes() {
        assert_eq!(GenerationError::Timeout.cause(), FailureCause::Timeout);
        assert_eq!(GenerationError::Cancelled.cause(), FailureCause::Timeout);
        assert_eq!(
            GenerationError::Rejected {
                status: 529,
                message: "overloaded".to_string()
            }
            .cause(),
            FailureCause::TransportFailure
        );
        assert_eq!(
            GenerationError::Unavailable("no key".to_string()).cause(),
            FailureCause::Unavailable
        );
    }

    #[test]
    fn test_error_display() {
        let err = GenerationError::Rejected {
            status: 401,
            message: "invalid x-api-key".to_string(),
        };
        assert_eq!(err.to_string(), "Request rejected (401): invalid x-api-key");
    }
}
