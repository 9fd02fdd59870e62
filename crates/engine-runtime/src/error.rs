use engine_config::error::ConfigError;
use engine_core::error::{SinkError, SourceError, StoreError};
use engine_processing::error::ExecutionError;
use thiserror::Error;

/// Top-level errors for a replication run. Every variant aborts the run
/// before the checkpoint is committed.
#[derive(Debug, Error)]
pub enum RunError {
    /// Invocation parameter or job file problem, raised before any side effect.
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigError),

    /// Checkpoint store unreachable, unprovisioned, missing the row or corrupt.
    #[error("Checkpoint unavailable: {0}")]
    CheckpointUnavailable(#[from] StoreError),

    #[error("Source read error: {0}")]
    SourceRead(#[from] SourceError),

    #[error("Sink write error: {0}")]
    SinkWrite(#[from] SinkError),

    /// A partition worker panicked.
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

impl From<ExecutionError> for RunError {
    fn from(err: ExecutionError) -> Self {
        match err {
            ExecutionError::Source(e) => RunError::SourceRead(e),
            ExecutionError::TaskJoin(e) => RunError::TaskJoin(e),
        }
    }
}

impl From<sled::Error> for RunError {
    fn from(err: sled::Error) -> Self {
        RunError::CheckpointUnavailable(StoreError::Sled(err))
    }
}
