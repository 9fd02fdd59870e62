use thiserror::Error;

/// Errors raised while resolving invocation parameters or the job file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required invocation parameter was not supplied.
    #[error("Missing required parameter: --{0}")]
    MissingParameter(&'static str),

    /// The job file could not be read.
    #[error("Failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The job file is not valid JSON for a job definition.
    #[error("Failed to parse job file: {0}")]
    Parse(#[from] serde_json::Error),

    /// An env file line is not `KEY=VALUE`.
    #[error("Invalid env file: {0}")]
    EnvFile(String),

    /// A `${VAR}` reference has no value.
    #[error("Undefined environment variable: {0}")]
    UndefinedVariable(String),

    /// The job definition parsed but is not usable.
    #[error("Invalid job configuration: {0}")]
    Invalid(String),
}
