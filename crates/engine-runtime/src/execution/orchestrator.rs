use super::{report::RunReport, state::RunState};
use crate::error::RunError;
use engine_core::{
    connectors::source::SourceReader,
    error::StoreError,
    state::{CheckpointStore, Provisioning},
};
use engine_processing::{
    executor::PartitionExecutor,
    loader::Loader,
    transform::{filter::WatermarkFilter, pipeline::Transform},
};
use model::{
    checkpoint::{Checkpoint, CheckpointStatus},
    core::watermark::Watermark,
    records::{Record, max_watermark},
};
use std::{sync::Arc, time::Instant};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Makes sure the checkpoint table exists, seeds `table_name` when the table
/// was just created, and returns the last committed watermark.
///
/// A row that is missing from an already provisioned table is an error, not a
/// reason to restart from zero.
pub async fn bootstrap_checkpoint(
    store: &dyn CheckpointStore,
    table_name: &str,
) -> Result<Watermark, StoreError> {
    if store.ensure_exists().await? == Provisioning::Created {
        let seed = Checkpoint::seed(table_name);
        info!(
            store = %store.describe(),
            table = %table_name,
            "Checkpoint table created, seeding initial row"
        );
        store
            .put(table_name, seed.last_watermark, seed.status)
            .await?;
    }

    store.get(table_name).await
}

/// Watermark to commit for a loaded slice. Never moves backwards.
fn commit_watermark(candidate: Option<Watermark>, previous: Watermark) -> Watermark {
    match candidate {
        Some(candidate) if candidate >= previous => candidate,
        other => {
            warn!(
                candidate = ?other.map(Watermark::value),
                previous = previous.value(),
                "Transformed slice has no watermark above the checkpoint, keeping previous value"
            );
            previous
        }
    }
}

struct Run {
    id: Uuid,
    state: RunState,
    started: Instant,
    previous: Watermark,
    committed: Option<Watermark>,
    rows_read: usize,
    rows_selected: usize,
    rows_written: usize,
}

impl Run {
    fn new(id: Uuid) -> Self {
        Self {
            id,
            state: RunState::Init,
            started: Instant::now(),
            previous: Watermark::ZERO,
            committed: None,
            rows_read: 0,
            rows_selected: 0,
            rows_written: 0,
        }
    }

    fn advance(&mut self, next: RunState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "illegal transition {} -> {}",
            self.state,
            next
        );
        debug!(run_id = %self.id, from = %self.state, to = %next, "Run state changed");
        self.state = next;
    }

    fn into_report(self, table_name: &str) -> RunReport {
        debug_assert!(self.state.is_terminal(), "report taken in state {}", self.state);
        RunReport {
            run_id: self.id,
            table_name: table_name.to_string(),
            final_state: self.state,
            previous_watermark: self.previous,
            committed_watermark: self.committed,
            rows_read: self.rows_read,
            rows_selected: self.rows_selected,
            rows_written: self.rows_written,
            duration: self.started.elapsed(),
        }
    }
}

/// Drives one incremental run for a single logical table: load the
/// checkpoint, select rows past it, transform, load, then commit.
pub struct Orchestrator<R: Record, T: Record> {
    table_name: String,
    store: Arc<dyn CheckpointStore>,
    source: Arc<dyn SourceReader<R>>,
    transform: Arc<dyn Transform<R, T>>,
    loader: Loader<T>,
    executor: PartitionExecutor,
}

impl<R: Record, T: Record> Orchestrator<R, T> {
    pub fn new(
        table_name: &str,
        store: Arc<dyn CheckpointStore>,
        source: Arc<dyn SourceReader<R>>,
        transform: Arc<dyn Transform<R, T>>,
        loader: Loader<T>,
        executor: PartitionExecutor,
    ) -> Self {
        Self {
            table_name: table_name.to_string(),
            store,
            source,
            transform,
            loader,
            executor,
        }
    }

    pub async fn run(&self, run_id: Uuid) -> Result<RunReport, RunError> {
        let mut run = Run::new(run_id);

        info!(
            run_id = %run_id,
            table = %self.table_name,
            store = %self.store.describe(),
            source = %self.source.describe(),
            "Starting incremental run"
        );

        run.previous = bootstrap_checkpoint(self.store.as_ref(), &self.table_name).await?;
        run.advance(RunState::CheckpointLoaded);
        info!(
            table = %self.table_name,
            watermark = %run.previous,
            "Loaded checkpoint"
        );

        let slice = self
            .executor
            .filter(self.source.read(), WatermarkFilter::new(run.previous))
            .await?;
        run.rows_read = slice.rows_read();
        run.rows_selected = slice.len();
        run.advance(RunState::Filtered);
        info!(
            table = %self.table_name,
            rows_read = run.rows_read,
            rows_selected = run.rows_selected,
            "Selected incremental slice"
        );

        if slice.is_empty() {
            run.advance(RunState::EmptyExit);
            info!(
                table = %self.table_name,
                watermark = %run.previous,
                "No new rows since last checkpoint, nothing to do"
            );
            return Ok(run.into_report(&self.table_name));
        }

        let records = self.executor.transform(slice, self.transform.clone()).await?;
        run.advance(RunState::Transformed);

        let candidate = commit_watermark(max_watermark(&records), run.previous);

        let ack = self.loader.write(&records).await?;
        run.rows_written = ack.rows_written;
        run.advance(RunState::Loaded);

        self.store
            .put(&self.table_name, candidate, CheckpointStatus::Completed)
            .await?;
        run.committed = Some(candidate);
        run.advance(RunState::CheckpointCommitted);

        info!(
            run_id = %run_id,
            table = %self.table_name,
            previous = %run.previous,
            committed = %candidate,
            rows_written = run.rows_written,
            duration_ms = run.started.elapsed().as_millis(),
            "Checkpoint committed"
        );

        Ok(run.into_report(&self.table_name))
    }
}
