//! Application-level configuration.
//!
//! - [`BatchParams`] - deadline, retry budget and degradation policy for one batch

pub mod batch_params;

pub use batch_params::BatchParams;
