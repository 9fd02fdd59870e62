use engine_config::error::ConfigError;
use engine_runtime::error::RunError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Failed to write output: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Run failed: {0}")]
    Runner(#[from] RunError),

    #[error("Failed to serialize data to JSON: {0}")]
    JsonSerialize(serde_json::Error),

    #[error("No checkpoint stored for table '{0}'")]
    CheckpointMissing(String),
}
