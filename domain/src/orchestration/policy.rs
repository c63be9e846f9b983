//! Degradation policy
//!
//! Decides when a batch with too many failed experts is thrown away and
//! replaced by the deterministic mock outcome. Degradation discards the
//! successful results too, so every batch is either all real or all mock.

use serde::{Deserialize, Serialize};

/// Rule for demoting a whole batch to mock output
///
/// ```
/// use shokunin_domain::DegradationPolicy;
///
/// let policy = DegradationPolicy::HalfRoundedUp;
/// assert_eq!(policy.threshold(4), 2);
/// assert_eq!(policy.threshold(5), 3);
/// assert!(policy.should_degrade(2, 4));
/// assert!(!policy.should_degrade(1, 4));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DegradationPolicy {
    /// Degrade once `failed >= ceil(total / 2)`
    #[default]
    HalfRoundedUp,

    /// Degrade once at least n experts failed
    AtLeast(usize),
}

impl DegradationPolicy {
    /// Minimum failure count that degrades a batch of `total` experts
    pub fn threshold(&self, total: usize) -> usize {
        match self {
            DegradationPolicy::HalfRoundedUp => total.div_ceil(2),
            DegradationPolicy::AtLeast(n) => *n,
        }
    }

    /// Check whether `failed` out of `total` experts degrades the batch
    pub fn should_degrade(&self, failed: usize, total: usize) -> bool {
        if total == 0 {
            return false;
        }
        failed >= self.threshold(total)
    }

    pub fn description(&self) -> String {
        match self {
            DegradationPolicy::HalfRoundedUp => "half of the experts (rounded up)".to_string(),
            DegradationPolicy::AtLeast(n) => format!("at least {} experts", n),
        }
    }
}

impl std::fmt::Display for DegradationPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.description())
    }
}
