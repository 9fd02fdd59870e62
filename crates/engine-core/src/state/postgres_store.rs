use crate::{
    connectors::postgres::{connect_client, quote_ident},
    error::StoreError,
    state::{CheckpointStore, Provisioning},
};
use async_trait::async_trait;
use model::{
    checkpoint::{Checkpoint, CheckpointStatus, StoredCheckpoint},
    core::watermark::Watermark,
};
use tokio_postgres::Client;
use tracing::info;

/// Checkpoint store kept in a Postgres table with one row per replicated table:
/// `(table_name TEXT PRIMARY KEY, last_checkpoint TEXT, status TEXT)`.
pub struct PostgresCheckpointStore {
    client: Client,
    store_name: String,
}

impl PostgresCheckpointStore {
    pub async fn connect(url: &str, store_name: &str) -> Result<Self, StoreError> {
        let client = connect_client(url, None).await?;
        Ok(Self::new(client, store_name))
    }

    pub fn new(client: Client, store_name: &str) -> Self {
        Self {
            client,
            store_name: store_name.to_string(),
        }
    }

    fn table(&self) -> String {
        quote_ident(&self.store_name)
    }

    async fn table_exists(&self) -> Result<bool, StoreError> {
        let row = self
            .client
            .query_one(
                "SELECT EXISTS (
                    SELECT 1 FROM information_schema.tables
                    WHERE table_schema = current_schema() AND table_name = $1
                )",
                &[&self.store_name],
            )
            .await?;
        Ok(row.get(0))
    }
}

#[async_trait]
impl CheckpointStore for PostgresCheckpointStore {
    async fn ensure_exists(&self) -> Result<Provisioning, StoreError> {
        if self.table_exists().await? {
            return Ok(Provisioning::Existing);
        }

        info!(store = %self.store_name, "Creating checkpoint table");
        self.client
            .batch_execute(&format!(
                "CREATE TABLE IF NOT EXISTS {} (
                    table_name TEXT PRIMARY KEY,
                    last_checkpoint TEXT NOT NULL,
                    status TEXT NOT NULL
                )",
                self.table()
            ))
            .await?;
        Ok(Provisioning::Created)
    }

    async fn load(&self, table_name: &str) -> Result<Option<Checkpoint>, StoreError> {
        let row = self
            .client
            .query_opt(
                &format!(
                    "SELECT table_name, last_checkpoint, status FROM {} WHERE table_name = $1",
                    self.table()
                ),
                &[&table_name],
            )
            .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let stored = StoredCheckpoint {
            table_name: row.get(0),
            last_checkpoint: row.get(1),
            status: row.get(2),
        };
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
        let row = StoredCheckpoint::from(&Checkpoint::new(table_name, watermark, status));
        self.client
            .execute(
                &format!(
                    "INSERT INTO {} (table_name, last_checkpoint, status) VALUES ($1, $2, $3)
                     ON CONFLICT (table_name) DO UPDATE
                     SET last_checkpoint = EXCLUDED.last_checkpoint, status = EXCLUDED.status",
                    self.table()
                ),
                &[&row.table_name, &row.last_checkpoint, &row.status],
            )
            .await?;
        Ok(())
    }

    fn describe(&self) -> String {
        format!("postgres#{}", self.store_name)
    }
}
