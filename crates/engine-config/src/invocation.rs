use crate::error::ConfigError;
use std::path::PathBuf;

/// Parameters every run must be started with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationParams {
    /// Staging directory used by the sink for temporary files.
    pub temp_dir: PathBuf,
    /// Identifier of the scheduled job this run belongs to.
    pub job_name: String,
}

impl InvocationParams {
    /// Validates raw options. Nothing has been touched yet when this fails.
    pub fn resolve(
        temp_dir: Option<String>,
        job_name: Option<String>,
    ) -> Result<Self, ConfigError> {
        let temp_dir = temp_dir
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::MissingParameter("temp-dir"))?;
        let job_name = job_name
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::MissingParameter("job-name"))?;

        Ok(Self {
            temp_dir: PathBuf::from(temp_dir),
            job_name,
        })
    }
}
