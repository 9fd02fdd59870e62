use crate::{
    error::RunError,
    execution::{
        factory,
        job::JobRun,
        orchestrator::Orchestrator,
        report::RunReport,
    },
};
use engine_config::{invocation::InvocationParams, job::JobConfig};
use engine_core::{error::StoreError, state::CheckpointStore};
use engine_processing::executor::PartitionExecutor;
use model::checkpoint::Checkpoint;
use tracing::{error, info};

/// Runs one incremental replication for `job`.
pub async fn run(job: JobConfig, params: InvocationParams) -> Result<RunReport, RunError> {
    let job_run = JobRun::init(&params);

    let store = factory::open_checkpoint_store(&job.checkpoint).await?;
    let source = factory::create_source(&job.source, job.partition_size);
    let transform = factory::create_transform(&job.transform);
    let loader = factory::create_loader(&job.target, &params).await?;

    let orchestrator = Orchestrator::new(
        &job.table_name,
        store,
        source,
        transform,
        loader,
        PartitionExecutor::new(job.parallelism),
    );

    match orchestrator.run(job_run.run_id).await {
        Ok(report) => {
            job_run.commit(&report);
            Ok(report)
        }
        Err(err) => {
            error!(
                job = %job_run.job_name,
                run_id = %job_run.run_id,
                table = %job.table_name,
                error = %err,
                "Run failed, checkpoint left unchanged"
            );
            Err(err)
        }
    }
}

/// Provisions the checkpoint table and seeds `job.table_name` without running.
pub async fn init_checkpoint(job: &JobConfig) -> Result<Checkpoint, RunError> {
    let store = factory::open_checkpoint_store(&job.checkpoint).await?;
    provision_checkpoint(store.as_ref(), &job.table_name).await
}

/// Idempotent bootstrap for `table_name`: creates the checkpoint table if
/// needed and seeds the row when it is absent, leaving an existing row alone.
pub async fn provision_checkpoint(
    store: &dyn CheckpointStore,
    table_name: &str,
) -> Result<Checkpoint, RunError> {
    store.ensure_exists().await?;

    let checkpoint = match store.load(table_name).await? {
        Some(checkpoint) => checkpoint,
        None => {
            let seed = Checkpoint::seed(table_name);
            info!(store = %store.describe(), table = %table_name, "Seeding checkpoint row");
            store
                .put(table_name, seed.last_watermark, seed.status)
                .await?;
            store
                .load(table_name)
                .await?
                .ok_or_else(|| StoreError::NotFound(table_name.to_string()))?
        }
    };

    info!(
        table = %checkpoint.table_name,
        watermark = %checkpoint.last_watermark,
        status = %checkpoint.status,
        "Checkpoint ready"
    );
    Ok(checkpoint)
}

/// Stored checkpoint for `table_name`, if any.
pub async fn show_checkpoint(
    job: &JobConfig,
    table_name: &str,
) -> Result<Option<Checkpoint>, RunError> {
    let store = factory::open_checkpoint_store(&job.checkpoint).await?;
    Ok(store.load(table_name).await?)
}
