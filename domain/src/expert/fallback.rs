//! Deterministic fallback text
//!
//! Canned output used whenever an expert cannot return generated text.
//! Always non-empty and always a pure function of role and task.

use super::profile::ExpertProfile;
use super::role::ExpertRole;
use crate::core::task::Task;
use std::time::Duration;

pub struct FallbackText;

impl FallbackText {
    /// Mock output for a role. Used when no backend is configured and for
    /// every result of a degraded batch.
    pub fn mock(role: ExpertRole, task: &Task) -> String {
        let profile = ExpertProfile::for_role(role);
        format!(
            "[{}] {} for \"{}\"...",
            role.display_name(),
            capitalize(profile.focus),
            task.description()
        )
    }

    /// Output for an expert whose every attempt failed
    pub fn after_failure(role: ExpertRole, task: &Task, attempts: u32) -> String {
        format!(
            "{}\n(note: generation failed after {} attempt(s); showing fallback text)",
            Self::mock(role, task),
            attempts
        )
    }

    /// Output for an expert still pending when the batch deadline expired
    pub fn timed_out(role: ExpertRole, task: &Task, timeout: Duration) -> String {
        format!(
            "{}\n(note: no response within the {:.2}s batch deadline; showing fallback text)",
            Self::mock(role, task),
            timeout.as_secs_f64()
        )
    }

    /// Output for an expert whose task crashed before reporting
    pub fn crashed(role: ExpertRole, task: &Task) -> String {
        format!(
            "{}\n(note: the expert stopped unexpectedly; showing fallback text)",
            Self::mock(role, task)
        )
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
