//! Failure taxonomy
//!
//! Every way an expert can miss producing real output. None of these are
//! fatal: each resolves to deterministic fallback text.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why an expert's result is not real generated text
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureCause {
    /// The generation call errored or the backend rejected the request
    #[error("generation transport failure")]
    TransportFailure,

    /// An attempt or the whole batch ran past its deadline
    #[error("deadline exceeded")]
    Timeout,

    /// No generation backend is configured
    #[error("generation backend unavailable")]
    Unavailable,
}

impl FailureCause {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureCause::TransportFailure => "transport_failure",
            FailureCause::Timeout => "timeout",
            FailureCause::Unavailable => "unavailable",
        }
    }

    /// Check if this cause comes from a missed deadline
    pub fn is_timeout(&self) -> bool {
        matches!(self, FailureCause::Timeout)
    }
}
