use model::error::ModelError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConnectionError {
    #[error("Invalid connection string: {0}")]
    InvalidUrl(String),

    #[error("TLS error: {0}")]
    Tls(#[from] native_tls::Error),

    #[error("PostgreSQL error: {0}")]
    Postgres(#[from] tokio_postgres::Error),
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("No checkpoint found for table '{0}'")]
    NotFound(String),

    #[error("Checkpoint store '{0}' has not been provisioned")]
    NotProvisioned(String),

    #[error("Checkpoint store is unavailable: {0}")]
    Unavailable(String),

    #[error("Corrupt checkpoint for table '{table}': {source}")]
    Corrupt {
        table: String,
        #[source]
        source: ModelError,
    },

    #[error("Failed to encode checkpoint: {0}")]
    Encode(#[from] bincode::Error),

    #[error("Sled error: {0}")]
    Sled(#[from] sled::Error),

    #[error("PostgreSQL error: {0}")]
    Postgres(#[from] tokio_postgres::Error),

    #[error("Connection error: {0}")]
    Connection(#[from] ConnectionError),
}

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Error reading source: {0}")]
    Read(String),

    #[error("Source reader task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

#[derive(Error, Debug)]
pub enum SinkError {
    #[error("I/O error while staging rows: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize staging file: {0}")]
    Csv(#[from] csv::Error),

    #[error("PostgreSQL error: {0}")]
    Postgres(#[from] tokio_postgres::Error),

    #[error("Connection error: {0}")]
    Connection(#[from] ConnectionError),

    #[error("Invalid target identifier: {0}")]
    InvalidIdentifier(String),

    #[error("Write rejected by sink: {0}")]
    Rejected(String),
}
