use crate::{
    error::ExecutionError,
    transform::{filter::WatermarkFilter, pipeline::Transform},
};
use engine_core::connectors::source::PartitionStream;
use futures::{StreamExt, TryStreamExt, stream};
use model::records::{Partition, Record};
use std::sync::Arc;
use tracing::debug;

/// Records that passed the watermark filter, still grouped by partition.
#[derive(Debug)]
pub struct FilteredSlice<R> {
    partitions: Vec<Partition<R>>,
    rows_read: usize,
    rows_selected: usize,
}

impl<R> Default for FilteredSlice<R> {
    fn default() -> Self {
        Self {
            partitions: Vec::new(),
            rows_read: 0,
            rows_selected: 0,
        }
    }
}

impl<R> FilteredSlice<R> {
    /// Rows scanned from the source, kept or not.
    pub fn rows_read(&self) -> usize {
        self.rows_read
    }

    pub fn len(&self) -> usize {
        self.rows_selected
    }

    pub fn is_empty(&self) -> bool {
        self.rows_selected == 0
    }

    pub fn into_records(self) -> impl Iterator<Item = R> {
        self.partitions.into_iter().flatten()
    }
}

/// Runs per-partition work on the blocking pool, up to `parallelism`
/// partitions at a time. Completion order is not preserved.
#[derive(Debug, Clone, Copy)]
pub struct PartitionExecutor {
    parallelism: usize,
}

impl PartitionExecutor {
    pub fn new(parallelism: usize) -> Self {
        Self {
            parallelism: parallelism.max(1),
        }
    }

    /// Drains the source and keeps the incremental slice.
    pub async fn filter<R: Record>(
        &self,
        partitions: PartitionStream<'_, R>,
        filter: WatermarkFilter,
    ) -> Result<FilteredSlice<R>, ExecutionError> {
        partitions
            .map(|partition| async move {
                let partition = partition?;
                let read = partition.len();
                let kept = tokio::task::spawn_blocking(move || {
                    filter.apply(partition).collect::<Partition<R>>()
                })
                .await?;
                debug!(read, kept = kept.len(), "Filtered partition");
                Ok::<_, ExecutionError>((read, kept))
            })
            .buffer_unordered(self.parallelism)
            .try_fold(FilteredSlice::default(), |mut slice, (read, kept)| async move {
                slice.rows_read += read;
                if !kept.is_empty() {
                    slice.rows_selected += kept.len();
                    slice.partitions.push(kept);
                }
                Ok(slice)
            })
            .await
    }

    /// Applies `transform` to every record of the slice.
    pub async fn transform<R, T>(
        &self,
        slice: FilteredSlice<R>,
        transform: Arc<dyn Transform<R, T>>,
    ) -> Result<Vec<T>, ExecutionError>
    where
        R: Record,
        T: Record,
    {
        let capacity = slice.len();
        stream::iter(slice.partitions)
            .map(|partition| {
                let transform = transform.clone();
                tokio::task::spawn_blocking(move || {
                    partition
                        .into_iter()
                        .map(|record| transform.apply(record))
                        .collect::<Vec<T>>()
                })
            })
            .buffer_unordered(self.parallelism)
            .map_err(ExecutionError::from)
            .try_fold(Vec::with_capacity(capacity), |mut out, part| async move {
                out.extend(part);
                Ok(out)
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::mapping::SentinelReplace;
    use engine_core::error::SourceError;
    use futures::stream::BoxStream;
    use model::{
        core::watermark::Watermark,
        records::row::{SourceRow, TargetRow},
    };

    fn row(id: i64, ts: Option<i64>) -> SourceRow {
        SourceRow {
            id,
            old_column: Some(if id % 2 == 0 { "something".into() } else { format!("v{id}") }),
            time_stamp: ts,
        }
    }

    fn partitions(
        parts: Vec<Vec<SourceRow>>,
    ) -> BoxStream<'static, Result<Partition<SourceRow>, SourceError>> {
        stream::iter(parts.into_iter().map(Ok)).boxed()
    }

    #[tokio::test]
    async fn filters_across_partitions() {
        let executor = PartitionExecutor::new(2);
        let parts = vec![
            vec![row(1, Some(5)), row(2, Some(12))],
            vec![row(3, None), row(4, Some(10))],
            vec![row(5, Some(30))],
        ];

        let slice = executor
            .filter(partitions(parts), WatermarkFilter::new(Watermark::new(10)))
            .await
            .unwrap();

        assert_eq!(slice.rows_read(), 5);
        assert_eq!(slice.len(), 2);
        let mut ids = slice.into_records().map(|r| r.id).collect::<Vec<_>>();
        ids.sort();
        assert_eq!(ids, vec![2, 5]);
    }

    #[tokio::test]
    async fn empty_source_gives_empty_slice() {
        let executor = PartitionExecutor::new(4);
        let slice = executor
            .filter(partitions(vec![]), WatermarkFilter::new(Watermark::ZERO))
            .await
            .unwrap();
        assert!(slice.is_empty());
        assert_eq!(slice.rows_read(), 0);
    }

    #[tokio::test]
    async fn source_error_aborts_filtering() {
        let executor = PartitionExecutor::new(1);
        let parts: Vec<Result<Partition<SourceRow>, SourceError>> = vec![
            Ok(vec![row(1, Some(5))]),
            Err(SourceError::Read("connection reset".into())),
        ];

        let result = executor
            .filter(stream::iter(parts).boxed(), WatermarkFilter::new(Watermark::ZERO))
            .await;
        assert!(matches!(result, Err(ExecutionError::Source(_))));
    }

    #[tokio::test]
    async fn transforms_every_selected_record() {
        let executor = PartitionExecutor::new(3);
        let parts = (0..10)
            .map(|p| (0..5).map(|i| row(p * 5 + i, Some(p * 5 + i + 1))).collect())
            .collect();

        let slice = executor
            .filter(partitions(parts), WatermarkFilter::new(Watermark::ZERO))
            .await
            .unwrap();
        let transform: Arc<dyn Transform<SourceRow, TargetRow>> =
            Arc::new(SentinelReplace::default());
        let out = executor.transform(slice, transform).await.unwrap();

        assert_eq!(out.len(), 50);
        for target in &out {
            let expected = if target.id % 2 == 0 {
                "new_something".to_string()
            } else {
                format!("v{}", target.id)
            };
            assert_eq!(target.new_column.as_deref(), Some(expected.as_str()));
        }
    }
}
