//! Expert role value object

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Identity of one expert in the council (Value Object)
///
/// Declaration order is the canonical result order: batch results are
/// sorted by role, never by completion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ExpertRole {
    /// Architecture and technology choices
    Design,
    /// Implementation plan
    Developer,
    /// Test strategy and quality assurance
    Quality,
    /// Performance and continuous improvement
    Optimization,
    /// Knowledge capture (optional member)
    Recorder,
}

impl ExpertRole {
    /// Roles that are always part of a batch
    pub const MANDATORY: [ExpertRole; 4] = [
        ExpertRole::Design,
        ExpertRole::Developer,
        ExpertRole::Quality,
        ExpertRole::Optimization,
    ];

    /// Stable identity used as the result key
    pub fn as_str(&self) -> &'static str {
        match self {
            ExpertRole::Design => "Design",
            ExpertRole::Developer => "Developer",
            ExpertRole::Quality => "Quality",
            ExpertRole::Optimization => "Optimization",
            ExpertRole::Recorder => "Recorder",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ExpertRole::Design => "Design Expert",
            ExpertRole::Developer => "Developer Expert",
            ExpertRole::Quality => "Quality Expert",
            ExpertRole::Optimization => "Optimization Expert",
            ExpertRole::Recorder => "Recorder",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            ExpertRole::Design => "🎨",
            ExpertRole::Developer => "💻",
            ExpertRole::Quality => "🔍",
            ExpertRole::Optimization => "🚀",
            ExpertRole::Recorder => "📝",
        }
    }

    /// The roles dispatched for one batch, in canonical order
    pub fn roster(recorder_enabled: bool) -> Vec<ExpertRole> {
        let mut roles = Self::MANDATORY.to_vec();
        if recorder_enabled {
            roles.push(ExpertRole::Recorder);
        }
        roles
    }
}

impl std::fmt::Display for ExpertRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ExpertRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "design" => Ok(ExpertRole::Design),
            "developer" => Ok(ExpertRole::Developer),
            "quality" => Ok(ExpertRole::Quality),
            "optimization" => Ok(ExpertRole::Optimization),
            "recorder" => Ok(ExpertRole::Recorder),
            other => Err(format!(
                "Unknown expert role: {}. Valid: design, developer, quality, optimization, recorder",
                other
            )),
        }
    }
}

impl Serialize for ExpertRole {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ExpertRole {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roster_without_recorder() {
        let roles = ExpertRole::roster(false);
        assert_eq!(roles.len(), 4);
        assert!(!roles.contains(&ExpertRole::Recorder));
    }

    #[test]
    fn test_roster_with_recorder_is_last() {
        let roles = ExpertRole::roster(true);
        assert_eq!(roles.len(), 5);
        assert_eq!(roles.last(), Some(&ExpertRole::Recorder));
    }

    #[test]
    fn test_ordering_follows_declaration() {
        let mut roles = vec![
            ExpertRole::Recorder,
            ExpertRole::Quality,
            ExpertRole::Design,
            ExpertRole::Optimization,
            ExpertRole::Developer,
        ];
        roles.sort();
        assert_eq!(roles, ExpertRole::roster(true));
    }

    #[test]
    fn test_roundtrip_str() {
        for role in ExpertRole::roster(true) {
            let parsed: ExpertRole = role.as_str().parse().unwrap();
            assert_eq!(parsed, role);
        }
        assert!("architect".parse::<ExpertRole>().is_err());
    }

    #[test]
    fn test_serde_uses_identity() {
        let json = serde_json::to_string(&ExpertRole::Optimization).unwrap();
        assert_eq!(json, "\"Optimization\"");
        let role: ExpertRole = serde_json::from_str("\"quality\"").unwrap();
        assert_eq!(role, ExpertRole::Quality);
    }
}
