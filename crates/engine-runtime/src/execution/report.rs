use super::state::RunState;
use model::core::watermark::Watermark;
use serde::Serialize;
use std::time::Duration;
use uuid::Uuid;

/// Outcome of a run that did not fail.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    pub run_id: Uuid,
    pub table_name: String,
    pub final_state: RunState,
    /// Watermark the slice was selected against.
    pub previous_watermark: Watermark,
    /// Watermark written by this run; `None` on an empty increment.
    pub committed_watermark: Option<Watermark>,
    pub rows_read: usize,
    pub rows_selected: usize,
    pub rows_written: usize,
    pub duration: Duration,
}

impl RunReport {
    pub fn is_empty_increment(&self) -> bool {
        self.final_state == RunState::EmptyExit
    }
}
