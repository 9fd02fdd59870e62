use engine_core::error::SourceError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("Failed to read source partition: {0}")]
    Source(#[from] SourceError),

    /// A partition worker panicked or was cancelled.
    #[error("Partition worker failed: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}
