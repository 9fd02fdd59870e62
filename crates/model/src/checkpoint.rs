use crate::{core::watermark::Watermark, error::ModelError};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Name of the checkpoint table used when none is configured.
pub const DEFAULT_CHECKPOINT_STORE: &str = "CHECKPOINT_TBL";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum CheckpointStatus {
    NotStarted,
    Completed,
    Failed,
}

impl CheckpointStatus {
    /// Persisted form of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckpointStatus::NotStarted => "No Executions yet",
            CheckpointStatus::Completed => "COMPLETED",
            CheckpointStatus::Failed => "FAILED",
        }
    }
}

impl fmt::Display for CheckpointStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CheckpointStatus {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "No Executions yet" | "NOT_STARTED" => Ok(CheckpointStatus::NotStarted),
            "COMPLETED" => Ok(CheckpointStatus::Completed),
            "FAILED" => Ok(CheckpointStatus::Failed),
            other => Err(ModelError::UnknownStatus(other.to_string())),
        }
    }
}

impl From<CheckpointStatus> for String {
    fn from(status: CheckpointStatus) -> Self {
        status.as_str().to_string()
    }
}

impl TryFrom<String> for CheckpointStatus {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Last watermark successfully replicated for one logical table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checkpoint {
    pub table_name: String,
    pub last_watermark: Watermark,
    pub status: CheckpointStatus,
}

impl Checkpoint {
    pub fn new(table_name: &str, last_watermark: Watermark, status: CheckpointStatus) -> Self {
        Checkpoint {
            table_name: table_name.to_string(),
            last_watermark,
            status,
        }
    }

    /// Row written the first time a checkpoint store is provisioned.
    pub fn seed(table_name: &str) -> Self {
        Checkpoint::new(table_name, Watermark::ZERO, CheckpointStatus::NotStarted)
    }
}

/// Checkpoint row as it sits in a store: every attribute in string form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredCheckpoint {
    pub table_name: String,
    pub last_checkpoint: String,
    pub status: String,
}

impl From<&Checkpoint> for StoredCheckpoint {
    fn from(cp: &Checkpoint) -> Self {
        StoredCheckpoint {
            table_name: cp.table_name.clone(),
            last_checkpoint: cp.last_watermark.to_string(),
            status: cp.status.to_string(),
        }
    }
}

impl TryFrom<StoredCheckpoint> for Checkpoint {
    type Error = ModelError;

    fn try_from(stored: StoredCheckpoint) -> Result<Self, Self::Error> {
        Ok(Checkpoint {
            last_watermark: stored.last_checkpoint.parse()?,
            status: stored.status.parse()?,
            table_name: stored.table_name,
        })
    }
}
