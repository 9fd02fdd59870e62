use crate::error::SinkError;
use async_trait::async_trait;
use model::records::Record;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[cfg(any(test, feature = "test-utils"))]
pub mod memory;
pub mod postgres;

/// Where and how a sink writes a slice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SinkConnection {
    /// Target database name.
    pub database: String,
    /// Target table, optionally schema-qualified.
    pub table: String,
    /// Directory for staging files written before the load.
    pub staging_dir: PathBuf,
    /// Connection identity (URL) of the target.
    pub connection: String,
}

/// Acknowledgement returned by a successful write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteAck {
    pub rows_written: usize,
}

/// Writes transformed records to a target store.
///
/// Atomicity is whatever the sink natively provides; the caller only relies on
/// re-writes of the same rows being safe.
#[async_trait]
pub trait Sink<T: Record>: Send + Sync {
    async fn write_table(
        &self,
        records: &[T],
        connection: &SinkConnection,
    ) -> Result<WriteAck, SinkError>;
}
