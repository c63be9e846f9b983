//! Expert profiles
//!
//! One configuration entry per role. Adding an expert means adding a
//! variant to [`ExpertRole`] and an entry to [`PROFILES`].

use super::role::ExpertRole;
use crate::core::task::Task;
use crate::prompt::PromptTemplate;

/// Prompt configuration for one expert role
#[derive(Debug, Clone, Copy)]
pub struct ExpertProfile {
    pub role: ExpertRole,
    system_prompt: fn() -> &'static str,
    user_prompt: fn(&Task) -> String,
    /// Short description of the work, used in fallback text
    pub focus: &'static str,
}

impl ExpertProfile {
    pub fn system_prompt(&self) -> &'static str {
        (self.system_prompt)()
    }

    pub fn user_prompt(&self, task: &Task) -> String {
        (self.user_prompt)(task)
    }

    /// Look up the profile for a role
    pub fn for_role(role: ExpertRole) -> &'static ExpertProfile {
        match role {
            ExpertRole::Design => &PROFILES[0],
            ExpertRole::Developer => &PROFILES[1],
            ExpertRole::Quality => &PROFILES[2],
            ExpertRole::Optimization => &PROFILES[3],
            ExpertRole::Recorder => &PROFILES[4],
        }
    }
}

/// All expert profiles, in role order
pub const PROFILES: [ExpertProfile; 5] = [
    ExpertProfile {
        role: ExpertRole::Design,
        system_prompt: PromptTemplate::design_system,
        user_prompt: PromptTemplate::design_user,
        focus: "architecture design analysis",
    },
    ExpertProfile {
        role: ExpertRole::Developer,
        system_prompt: PromptTemplate::developer_system,
        user_prompt: PromptTemplate::developer_user,
        focus: "core feature implementation",
    },
    ExpertProfile {
        role: ExpertRole::Quality,
        system_prompt: PromptTemplate::quality_system,
        user_prompt: PromptTemplate::quality_user,
        focus: "test strategy",
    },
    ExpertProfile {
        role: ExpertRole::Optimization,
        system_prompt: PromptTemplate::optimization_system,
        user_prompt: PromptTemplate::optimization_user,
        focus: "performance optimization",
    },
    ExpertProfile {
        role: ExpertRole::Recorder,
        system_prompt: PromptTemplate::recorder_system,
        user_prompt: PromptTemplate::recorder_user,
        focus: "decision and lesson recording",
    },
];
