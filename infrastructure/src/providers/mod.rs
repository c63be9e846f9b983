//! Generation backends
//!
//! Adapters implementing the [`TextGenerator`](shokunin_application::TextGenerator) port.

pub mod anthropic;

pub use anthropic::{AnthropicGenerator, AnthropicSettings};
