use clap::Subcommand;

#[derive(Subcommand)]
pub enum Commands {
    /// Replicate rows newer than the stored checkpoint and advance it
    Run {
        #[arg(long, help = "Job file path")]
        config: String,

        #[arg(long = "temp-dir", alias = "TempDir", help = "Staging directory for the sink")]
        temp_dir: Option<String>,

        #[arg(long = "job-name", alias = "JOB_NAME", help = "Name of the scheduled job")]
        job_name: Option<String>,

        #[arg(long, help = "KEY=VALUE file used to expand ${VAR} references")]
        env_file: Option<String>,

        #[arg(
            long,
            help = "If specified, writes the JSON run report to this file instead of stdout"
        )]
        report: Option<String>,
    },
    Checkpoint {
        #[command(subcommand)]
        command: CheckpointCommand,
    },
}

#[derive(Subcommand)]
pub enum CheckpointCommand {
    /// Print the stored checkpoint of a table
    Show {
        #[arg(long, help = "Job file path")]
        config: String,

        #[arg(long, help = "Table to inspect, defaults to the job's table_name")]
        table: Option<String>,

        #[arg(long, help = "KEY=VALUE file used to expand ${VAR} references")]
        env_file: Option<String>,

        #[arg(
            long,
            help = "If set, prints the checkpoint as JSON instead of a table"
        )]
        json: bool,
    },
    /// Create the checkpoint table and seed the job's row if needed
    Init {
        #[arg(long, help = "Job file path")]
        config: String,

        #[arg(long, help = "KEY=VALUE file used to expand ${VAR} references")]
        env_file: Option<String>,
    },
}
