//! Prompt domain
//!
//! System and user prompt templates for each expert role.

mod template;

pub use template::PromptTemplate;
