use serde::{Deserialize, Serialize};

/// What a merged net does when a pull-up and a pull-down end up on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PullConflictPolicy {
    /// Both resistors cancel out; the net floats when nothing drives it.
    #[default]
    Float,
    /// The net goes high-Z and the step fails with a burn error.
    Fault,
}

/// Behavior switches of the bus subsystem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BusConfig {
    pub pull_conflict: PullConflictPolicy,
    /// Keep a record of burns that aborted a step.
    pub history_enabled: bool,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            pull_conflict: PullConflictPolicy::Float,
            history_enabled: true,
        }
    }
}

impl BusConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
