use crate::error::RunError;
use engine_config::{
    invocation::InvocationParams,
    job::{CheckpointBackend, CheckpointConfig, SourceConfig, TargetConfig, TransformConfig},
};
use engine_core::{
    connectors::{
        sink::{SinkConnection, postgres::PostgresSink},
        source::{CsvSource, SourceReader},
    },
    state::{
        CheckpointStore, postgres_store::PostgresCheckpointStore, sled_store::SledCheckpointStore,
    },
};
use engine_processing::{
    loader::Loader,
    transform::{mapping::SentinelReplace, pipeline::Transform},
};
use model::records::row::{SourceRow, TargetRow};
use std::sync::Arc;
use tracing::info;

pub async fn open_checkpoint_store(
    config: &CheckpointConfig,
) -> Result<Arc<dyn CheckpointStore>, RunError> {
    let store: Arc<dyn CheckpointStore> = match &config.backend {
        CheckpointBackend::Sled { path } => {
            let path = CheckpointBackend::sled_path(path)?;
            Arc::new(SledCheckpointStore::open(&path, &config.store)?)
        }
        CheckpointBackend::Postgres { connection } => {
            Arc::new(PostgresCheckpointStore::connect(connection, &config.store).await?)
        }
    };

    info!(store = %store.describe(), "Opened checkpoint store");
    Ok(store)
}

pub fn create_source(config: &SourceConfig, partition_size: usize) -> Arc<dyn SourceReader<SourceRow>> {
    Arc::new(CsvSource::<SourceRow>::new(
        &config.database,
        &config.table,
        &config.path,
        partition_size,
    ))
}

pub fn create_transform(config: &TransformConfig) -> Arc<dyn Transform<SourceRow, TargetRow>> {
    Arc::new(SentinelReplace::new(&config.sentinel, &config.replacement))
}

pub fn sink_connection(target: &TargetConfig, params: &InvocationParams) -> SinkConnection {
    SinkConnection {
        database: target.database.clone(),
        table: target.table.clone(),
        staging_dir: params.temp_dir.clone(),
        connection: target.connection.clone(),
    }
}

pub async fn create_loader(
    target: &TargetConfig,
    params: &InvocationParams,
) -> Result<Loader<TargetRow>, RunError> {
    let connection = sink_connection(target, params);
    let sink = PostgresSink::connect(&connection).await?;
    Ok(Loader::new(Arc::new(sink), connection))
}

#[cfg(test)]
mod tests {
    use super::*;
    use model::{checkpoint::CheckpointStatus, core::watermark::Watermark};
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[tokio::test]
    async fn opens_sled_store_at_configured_path() {
        let dir = TempDir::new().unwrap();
        let config = CheckpointConfig {
            store: "CHECKPOINT_TBL".into(),
            backend: CheckpointBackend::Sled {
                path: Some(dir.path().join("state")),
            },
        };

        let store = open_checkpoint_store(&config).await.unwrap();
        store.ensure_exists().await.unwrap();
        store
            .put("target_tbl", Watermark::new(7), CheckpointStatus::Completed)
            .await
            .unwrap();
        assert_eq!(store.get("target_tbl").await.unwrap(), Watermark::new(7));
    }

    #[test]
    fn sink_connection_uses_invocation_temp_dir() {
        let target = TargetConfig {
            database: "redshift_db".into(),
            table: "public.target_tbl".into(),
            connection: "postgres://etl@warehouse/redshift_db".into(),
        };
        let params = InvocationParams {
            temp_dir: PathBuf::from("/mnt/stage"),
            job_name: "nightly".into(),
        };

        let conn = sink_connection(&target, &params);
        assert_eq!(conn.staging_dir, PathBuf::from("/mnt/stage"));
        assert_eq!(conn.table, "public.target_tbl");
        assert_eq!(conn.database, "redshift_db");
    }
}
