use crate::{env::EnvManager, error::ConfigError};
use model::checkpoint::DEFAULT_CHECKPOINT_STORE;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

/// Definition of one replication job, read from a JSON file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JobConfig {
    /// Logical table name the checkpoint is keyed by.
    pub table_name: String,
    pub source: SourceConfig,
    pub target: TargetConfig,
    #[serde(default)]
    pub checkpoint: CheckpointConfig,
    #[serde(default)]
    pub transform: TransformConfig,
    /// Number of partitions filtered or transformed concurrently.
    #[serde(default = "default_parallelism")]
    pub parallelism: usize,
    /// Rows per partition handed out by the source reader.
    #[serde(default = "default_partition_size")]
    pub partition_size: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SourceConfig {
    pub database: String,
    pub table: String,
    /// CSV export of the source table.
    pub path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TargetConfig {
    pub database: String,
    pub table: String,
    /// Postgres connection URL of the target.
    pub connection: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CheckpointConfig {
    /// Name of the checkpoint table inside the backend.
    #[serde(default = "default_store")]
    pub store: String,
    #[serde(default)]
    pub backend: CheckpointBackend,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CheckpointBackend {
    /// Embedded store; defaults to `~/.tidemark/checkpoints`.
    Sled {
        #[serde(default)]
        path: Option<PathBuf>,
    },
    Postgres {
        connection: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TransformConfig {
    #[serde(default = "default_sentinel")]
    pub sentinel: String,
    #[serde(default = "default_replacement")]
    pub replacement: String,
}

fn default_parallelism() -> usize {
    4
}

fn default_partition_size() -> usize {
    1024
}

fn default_store() -> String {
    DEFAULT_CHECKPOINT_STORE.to_string()
}

fn default_sentinel() -> String {
    "something".to_string()
}

fn default_replacement() -> String {
    "new_something".to_string()
}

impl Default for CheckpointConfig {
    fn default() -> Self {
        Self {
            store: default_store(),
            backend: CheckpointBackend::default(),
        }
    }
}

impl Default for CheckpointBackend {
    fn default() -> Self {
        CheckpointBackend::Sled { path: None }
    }
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            sentinel: default_sentinel(),
            replacement: default_replacement(),
        }
    }
}

impl CheckpointBackend {
    /// Directory of the embedded store, falling back to the home directory.
    pub fn sled_path(path: &Option<PathBuf>) -> Result<PathBuf, ConfigError> {
        if let Some(path) = path {
            return Ok(path.clone());
        }
        let home = dirs::home_dir()
            .ok_or_else(|| ConfigError::Invalid("Could not determine home directory".into()))?;
        Ok(home.join(".tidemark/checkpoints"))
    }
}

impl JobConfig {
    /// Reads `path`, expands `${VAR}` references and validates the result.
    pub fn load(path: impl AsRef<Path>, env: &EnvManager) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;

        let job = Self::from_json(&env.expand(&raw)?)?;
        info!(table = %job.table_name, file = %path.display(), "Loaded job configuration");
        Ok(job)
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let job: JobConfig = serde_json::from_str(json)?;
        job.validate()?;
        Ok(job)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.table_name.trim().is_empty() {
            return Err(ConfigError::Invalid("table_name must not be empty".into()));
        }
        if self.target.table.trim().is_empty() {
            return Err(ConfigError::Invalid("target.table must not be empty".into()));
        }
        if self.checkpoint.store.trim().is_empty() {
            return Err(ConfigError::Invalid("checkpoint.store must not be empty".into()));
        }
        if self.parallelism == 0 {
            return Err(ConfigError::Invalid("parallelism must be at least 1".into()));
        }
        if self.partition_size == 0 {
            return Err(ConfigError::Invalid("partition_size must be at least 1".into()));
        }
        Ok(())
    }
}
