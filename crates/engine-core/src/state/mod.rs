use crate::error::StoreError;
use async_trait::async_trait;
use model::{
    checkpoint::{Checkpoint, CheckpointStatus},
    core::watermark::Watermark,
};

#[cfg(any(test, feature = "test-utils"))]
pub mod memory;
pub mod postgres_store;
pub mod sled_store;

/// Outcome of [`CheckpointStore::ensure_exists`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provisioning {
    /// The backing table was absent and has just been created.
    Created,
    /// The backing table was already there.
    Existing,
}

/// Durable key-value persistence for checkpoints, keyed by logical table name.
///
/// Writes are last-writer-wins: stores do no locking and no compare-and-swap,
/// so at most one run per table may be active at a time.
#[async_trait]
pub trait CheckpointStore: Send + Sync {
    /// Creates the backing table if it is absent and waits until it accepts
    /// reads and writes. Safe to call on every startup.
    async fn ensure_exists(&self) -> Result<Provisioning, StoreError>;

    /// Full checkpoint row for `table_name`, if one exists.
    async fn load(&self, table_name: &str) -> Result<Option<Checkpoint>, StoreError>;

    /// Replaces any prior row for `table_name` unconditionally.
    async fn put(
        &self,
        table_name: &str,
        watermark: Watermark,
        status: CheckpointStatus,
    ) -> Result<(), StoreError>;

    /// Last committed watermark for `table_name`.
    async fn get(&self, table_name: &str) -> Result<Watermark, StoreError> {
        self.load(table_name)
            .await?
            .map(|cp| cp.last_watermark)
            .ok_or_else(|| StoreError::NotFound(table_name.to_string()))
    }

    /// Human readable description used in logs.
    fn describe(&self) -> String;
}
