use crate::{
    error::StoreError,
    state::{CheckpointStore, Provisioning},
};
use async_trait::async_trait;
use model::{
    checkpoint::{Checkpoint, CheckpointStatus, StoredCheckpoint},
    core::watermark::Watermark,
};
use std::path::{Path, PathBuf};
use tracing::info;

/// Checkpoint store backed by an embedded sled database.
///
/// Each checkpoint table is a sled tree; rows are keyed by table name and hold
/// a bincode-encoded [`StoredCheckpoint`].
pub struct SledCheckpointStore {
    db: sled::Db,
    path: PathBuf,
    store_name: String,
}

impl SledCheckpointStore {
    pub fn open(path: impl AsRef<Path>, store_name: &str) -> Result<Self, sled::Error> {
        let path = path.as_ref().to_path_buf();
        let db = sled::open(&path)?;
        Ok(Self {
            db,
            path,
            store_name: store_name.to_string(),
        })
    }

    fn is_provisioned(&self) -> bool {
        self.db
            .tree_names()
            .iter()
            .any(|name| name.as_ref() == self.store_name.as_bytes())
    }

    /// Opens the checkpoint tree, refusing to create it implicitly.
    fn tree(&self) -> Result<sled::Tree, StoreError> {
        if !self.is_provisioned() {
            return Err(StoreError::NotProvisioned(self.store_name.clone()));
        }
        Ok(self.db.open_tree(&self.store_name)?)
    }
}

#[async_trait]
impl CheckpointStore for SledCheckpointStore {
    async fn ensure_exists(&self) -> Result<Provisioning, StoreError> {
        if self.is_provisioned() {
            return Ok(Provisioning::Existing);
        }

        info!(store = %self.store_name, path = %self.path.display(), "Creating checkpoint store");
        self.db.open_tree(&self.store_name)?;
        // Wait for the new tree to hit disk before reporting it ready.
        self.db.flush_async().await?;
        Ok(Provisioning::Created)
    }

    async fn load(&self, table_name: &str) -> Result<Option<Checkpoint>, StoreError> {
        let Some(bytes) = self.tree()?.get(table_name)? else {
            return Ok(None);
        };

        let stored: StoredCheckpoint = bincode::deserialize(&bytes)?;
        let checkpoint = Checkpoint::try_from(stored).map_err(|source| StoreError::Corrupt {
            table: table_name.to_string(),
            source,
        })?;
        Ok(Some(checkpoint))
    }

    async fn put(
        &self,
        table_name: &str,
        watermark: Watermark,
        status: CheckpointStatus,
    ) -> Result<(), StoreError> {
        let tree = self.tree()?;
        let row = StoredCheckpoint::from(&Checkpoint::new(table_name, watermark, status));
        let bytes = bincode::serialize(&row)?;

        tree.insert(table_name, bytes)?;
        tree.flush_async().await?;
        Ok(())
    }

    fn describe(&self) -> String {
        format!("sled:{}#{}", self.path.display(), self.store_name)
    }
}
