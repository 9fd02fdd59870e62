use crate::{
    commands::{CheckpointCommand, Commands},
    error::CliError,
};
use clap::Parser;
use engine_config::{env::EnvManager, invocation::InvocationParams, job::JobConfig};
use engine_runtime::execution::executor;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod commands;
mod error;
mod output;

#[derive(Parser)]
#[command(
    name = "tidemark",
    version = "0.1.0",
    about = "Checkpointed incremental table replication"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            temp_dir,
            job_name,
            env_file,
            report,
        } => {
            let params = InvocationParams::resolve(temp_dir, job_name)?;
            let job = load_job(&config, env_file.as_deref())?;

            let run_report = executor::run(job, params).await?;
            match report {
                Some(path) => output::write_report(&run_report, path).await?,
                None => output::print_report(&run_report)?,
            }
        }
        Commands::Checkpoint { command } => match command {
            CheckpointCommand::Show {
                config,
                table,
                env_file,
                json,
            } => {
                let job = load_job(&config, env_file.as_deref())?;
                let table = table.unwrap_or_else(|| job.table_name.clone());
                let checkpoint = executor::show_checkpoint(&job, &table)
                    .await?
                    .ok_or(CliError::CheckpointMissing(table))?;
                output::print_checkpoint(&checkpoint, json)?;
            }
            CheckpointCommand::Init { config, env_file } => {
                let job = load_job(&config, env_file.as_deref())?;
                let checkpoint = executor::init_checkpoint(&job).await?;
                output::print_checkpoint(&checkpoint, false)?;
            }
        },
    }

    Ok(())
}

fn load_job(path: &str, env_file: Option<&str>) -> Result<JobConfig, CliError> {
    let mut env = EnvManager::new();
    if let Some(env_file) = env_file {
        info!("Loading environment from {env_file}");
        env.load_from_file(env_file)?;
    }
    Ok(JobConfig::load(path, &env)?)
}
