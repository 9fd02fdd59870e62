use super::report::RunReport;
use chrono::{DateTime, Utc};
use engine_config::invocation::InvocationParams;
use tracing::info;
use uuid::Uuid;

/// Bookkeeping for one scheduled job invocation.
#[derive(Debug, Clone)]
pub struct JobRun {
    pub job_name: String,
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
}

impl JobRun {
    pub fn init(params: &InvocationParams) -> Self {
        let job = Self {
            job_name: params.job_name.clone(),
            run_id: Uuid::new_v4(),
            started_at: Utc::now(),
        };
        info!(job = %job.job_name, run_id = %job.run_id, "Job initialized");
        job
    }

    /// Marks the job successful. Only called once the run returned a report.
    pub fn commit(self, report: &RunReport) {
        info!(
            job = %self.job_name,
            run_id = %self.run_id,
            table = %report.table_name,
            state = %report.final_state,
            started_at = %self.started_at.to_rfc3339(),
            duration_ms = report.duration.as_millis(),
            "Job committed"
        );
    }
}
