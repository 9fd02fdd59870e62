#![allow(dead_code)]

use engine_core::{
    connectors::{
        sink::{SinkConnection, memory::MemorySink},
        source::CsvSource,
    },
    state::{CheckpointStore, sled_store::SledCheckpointStore},
};
use engine_processing::{executor::PartitionExecutor, loader::Loader, transform::mapping::SentinelReplace};
use engine_runtime::execution::orchestrator::Orchestrator;
use model::{
    checkpoint::{Checkpoint, DEFAULT_CHECKPOINT_STORE},
    records::row::{SourceRow, TargetRow},
};
use std::{path::PathBuf, sync::Arc};
use tempfile::TempDir;

pub mod postgres;
pub mod utils;

pub const TABLE: &str = "target_tbl";

/// A CSV source and a sled checkpoint store in a scratch directory, loading
/// into an in-memory sink.
pub struct Harness {
    dir: TempDir,
    pub source_path: PathBuf,
    pub store: Arc<SledCheckpointStore>,
    pub sink: MemorySink<TargetRow>,
}

impl Harness {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("create scratch dir");
        let source_path = dir.path().join("source_tbl.csv");
        let store = SledCheckpointStore::open(dir.path().join("checkpoints"), DEFAULT_CHECKPOINT_STORE)
            .expect("open sled store");

        Self {
            dir,
            source_path,
            store: Arc::new(store),
            sink: MemorySink::new(),
        }
    }

    pub fn staging_dir(&self) -> PathBuf {
        self.dir.path().join("stage")
    }

    pub fn orchestrator(&self) -> Orchestrator<SourceRow, TargetRow> {
        let connection = SinkConnection {
            database: "redshift_db".into(),
            table: TABLE.into(),
            staging_dir: self.staging_dir(),
            connection: "memory".into(),
        };

        Orchestrator::new(
            TABLE,
            self.store.clone(),
            Arc::new(CsvSource::<SourceRow>::new(
                "catalog_db",
                "source_tbl",
                &self.source_path,
                2,
            )),
            Arc::new(SentinelReplace::default()),
            Loader::new(Arc::new(self.sink.clone()), connection),
            PartitionExecutor::new(3),
        )
    }

    pub async fn checkpoint(&self) -> Option<Checkpoint> {
        self.store.load(TABLE).await.expect("load checkpoint")
    }
}

impl Default for Harness {
    fn default() -> Self {
        Self::new()
    }
}
