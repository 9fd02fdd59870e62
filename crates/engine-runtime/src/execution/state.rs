use serde::Serialize;
use std::fmt;

/// Stages of a single replication run.
///
/// ```text
/// Init -> CheckpointLoaded -> Filtered -> EmptyExit
///                                      -> Transformed -> Loaded -> CheckpointCommitted
/// ```
///
/// Any failure aborts the run from whatever stage it reached; only
/// `CheckpointCommitted` mutates the checkpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RunState {
    Init,
    CheckpointLoaded,
    Filtered,
    EmptyExit,
    Transformed,
    Loaded,
    CheckpointCommitted,
}

impl RunState {
    pub fn can_transition_to(self, next: RunState) -> bool {
        use RunState::*;
        matches!(
            (self, next),
            (Init, CheckpointLoaded)
                | (CheckpointLoaded, Filtered)
                | (Filtered, EmptyExit)
                | (Filtered, Transformed)
                | (Transformed, Loaded)
                | (Loaded, CheckpointCommitted)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, RunState::EmptyExit | RunState::CheckpointCommitted)
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RunState::Init => "Init",
            RunState::CheckpointLoaded => "CheckpointLoaded",
            RunState::Filtered => "Filtered",
            RunState::EmptyExit => "EmptyExit",
            RunState::Transformed => "Transformed",
            RunState::Loaded => "Loaded",
            RunState::CheckpointCommitted => "CheckpointCommitted",
        };
        f.write_str(name)
    }
}
