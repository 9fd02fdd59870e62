use crate::{
    error::StoreError,
    state::{CheckpointStore, Provisioning},
};
use async_trait::async_trait;
use model::{
    checkpoint::{Checkpoint, CheckpointStatus, StoredCheckpoint},
    core::watermark::Watermark,
};
use std::{collections::HashMap, sync::Arc};
use tokio::sync::Mutex;

#[derive(Debug, Default)]
struct Inner {
    provisioned: bool,
    unavailable: bool,
    rows: HashMap<String, StoredCheckpoint>,
    history: Vec<Checkpoint>,
}

/// In-process checkpoint store. Keeps every committed row in `history` so
/// tests can assert on the sequence of writes.
#[derive(Debug, Clone, Default)]
pub struct MemoryCheckpointStore {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryCheckpointStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that is already provisioned and holds `checkpoint`.
    pub async fn with_checkpoint(checkpoint: Checkpoint) -> Self {
        let store = Self::new();
        {
            let mut inner = store.inner.lock().await;
            inner.provisioned = true;
            inner
                .rows
                .insert(checkpoint.table_name.clone(), StoredCheckpoint::from(&checkpoint));
        }
        store
    }

    /// Makes every subsequent call fail as if the store were unreachable.
    pub async fn set_unavailable(&self, unavailable: bool) {
        self.inner.lock().await.unavailable = unavailable;
    }

    /// Overwrites the raw stored row, bypassing validation.
    pub async fn insert_raw(&self, row: StoredCheckpoint) {
        let mut inner = self.inner.lock().await;
        inner.provisioned = true;
        inner.rows.insert(row.table_name.clone(), row);
    }

    pub async fn history(&self) -> Vec<Checkpoint> {
        self.inner.lock().await.history.clone()
    }

    fn check(inner: &Inner) -> Result<(), StoreError> {
        if inner.unavailable {
            return Err(StoreError::Unavailable("memory store switched off".into()));
        }
        if !inner.provisioned {
            return Err(StoreError::NotProvisioned("memory".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl CheckpointStore for MemoryCheckpointStore {
    async fn ensure_exists(&self) -> Result<Provisioning, StoreError> {
        let mut inner = self.inner.lock().await;
        if inner.unavailable {
            return Err(StoreError::Unavailable("memory store switched off".into()));
        }
        if inner.provisioned {
            return Ok(Provisioning::Existing);
        }
        inner.provisioned = true;
        Ok(Provisioning::Created)
    }

    async fn load(&self, table_name: &str) -> Result<Option<Checkpoint>, StoreError> {
        let inner = self.inner.lock().await;
        Self::check(&inner)?;

        inner
            .rows
            .get(table_name)
            .cloned()
            .map(|row| {
                Checkpoint::try_from(row).map_err(|source| StoreError::Corrupt {
                    table: table_name.to_string(),
                    source,
                })
            })
            .transpose()
    }

    async fn put(
        &self,
        table_name: &str,
        watermark: Watermark,
        status: CheckpointStatus,
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().await;
        Self::check(&inner)?;

        let checkpoint = Checkpoint::new(table_name, watermark, status);
        inner
            .rows
            .insert(table_name.to_string(), StoredCheckpoint::from(&checkpoint));
        inner.history.push(checkpoint);
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}
