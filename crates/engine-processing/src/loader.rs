use engine_core::{
    connectors::sink::{Sink, SinkConnection, WriteAck},
    error::SinkError,
};
use model::records::Record;
use std::{sync::Arc, time::Instant};
use tracing::info;

/// Writes a transformed slice to the configured sink.
pub struct Loader<T: Record> {
    sink: Arc<dyn Sink<T>>,
    connection: SinkConnection,
}

impl<T: Record> Loader<T> {
    pub fn new(sink: Arc<dyn Sink<T>>, connection: SinkConnection) -> Self {
        Self { sink, connection }
    }

    pub async fn write(&self, records: &[T]) -> Result<WriteAck, SinkError> {
        let start = Instant::now();

        info!(
            table = %self.connection.table,
            row_count = records.len(),
            "Writing slice to target"
        );

        let ack = self.sink.write_table(records, &self.connection).await?;

        let duration = start.elapsed();
        let rows_per_sec = ack.rows_written as f64 / duration.as_secs_f64().max(f64::EPSILON);
        info!(
            table = %self.connection.table,
            rows = ack.rows_written,
            duration_ms = duration.as_millis(),
            rows_per_sec = %format!("{:.2}", rows_per_sec),
            "Slice written successfully"
        );

        Ok(ack)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine_core::connectors::sink::memory::MemorySink;
    use model::records::row::TargetRow;
    use std::path::PathBuf;

    fn connection() -> SinkConnection {
        SinkConnection {
            database: "redshift_db".into(),
            table: "target_tbl".into(),
            staging_dir: PathBuf::from("/tmp/stage"),
            connection: "memory".into(),
        }
    }

    fn target(id: i64) -> TargetRow {
        TargetRow {
            id,
            old_column: None,
            new_column: None,
            time_stamp: Some(id),
        }
    }

    #[tokio::test]
    async fn writes_through_sink() {
        let sink = MemorySink::<TargetRow>::new();
        let loader = Loader::new(Arc::new(sink.clone()), connection());

        let ack = loader.write(&[target(1), target(2)]).await.unwrap();
        assert_eq!(ack.rows_written, 2);
        assert_eq!(sink.rows().await, vec![target(1), target(2)]);
    }

    #[tokio::test]
    async fn propagates_sink_failure() {
        let sink = MemorySink::<TargetRow>::new();
        sink.set_failing(true).await;
        let loader = Loader::new(Arc::new(sink.clone()), connection());

        let result = loader.write(&[target(1)]).await;
        assert!(matches!(result, Err(SinkError::Rejected(_))));
        assert!(sink.rows().await.is_empty());
    }
}
