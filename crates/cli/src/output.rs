use crate::error::CliError;
use engine_runtime::execution::report::RunReport;
use model::checkpoint::Checkpoint;

pub async fn write_report(report: &RunReport, path: String) -> Result<(), CliError> {
    let json = serde_json::to_string_pretty(report).map_err(CliError::JsonSerialize)?;
    tokio::fs::write(path, json).await?;
    Ok(())
}

pub fn print_report(report: &RunReport) -> Result<(), CliError> {
    let json = serde_json::to_string_pretty(report).map_err(CliError::JsonSerialize)?;
    println!("{json}");
    Ok(())
}

pub fn print_checkpoint(checkpoint: &Checkpoint, as_json: bool) -> Result<(), CliError> {
    if as_json {
        let json = serde_json::to_string_pretty(checkpoint).map_err(CliError::JsonSerialize)?;
        println!("{json}");
        return Ok(());
    }

    println!("Checkpoint for table '{}':", checkpoint.table_name);
    println!("-----------------------------");
    println!("{:<16} {}", "Last watermark", checkpoint.last_watermark);
    println!("{:<16} {}", "Status", checkpoint.status);
    Ok(())
}
