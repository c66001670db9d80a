use serde::{Deserialize, Serialize};

/// What the assembler does when an asset cannot be resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionPolicy {
    /// Abort the whole assembly; no scene is produced.
    #[default]
    FailFast,
    /// Skip the missing asset and everything that references it.
    BestEffort,
}

impl std::fmt::Display for ResolutionPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResolutionPolicy::FailFast => write!(f, "fail_fast"),
            ResolutionPolicy::BestEffort => write!(f, "best_effort"),
        }
    }
}

/// How `follow` directives and attachments are realized in the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FollowMode {
    /// Live link: the follower tracks the target every frame.
    #[default]
    Continuous,
    /// Place the follower once, at the target's location on the first frame.
    Snapshot,
}

impl std::fmt::Display for FollowMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FollowMode::Continuous => write!(f, "continuous"),
            FollowMode::Snapshot => write!(f, "snapshot"),
        }
    }
}
