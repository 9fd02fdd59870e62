use crate::error::SourceError;
use futures::stream::{self, BoxStream, StreamExt};
use model::records::Partition;
use serde::de::DeserializeOwned;
use std::{
    fs::File,
    marker::PhantomData,
    path::{Path, PathBuf},
};
use tracing::debug;

pub type PartitionStream<'a, R> = BoxStream<'a, Result<Partition<R>, SourceError>>;

/// Reads the full (or partition-pruned) source table.
///
/// The returned stream is lazy: nothing is read until it is polled, and
/// partitions may be processed in any order.
pub trait SourceReader<R>: Send + Sync {
    fn read(&self) -> PartitionStream<'_, R>;

    fn describe(&self) -> String;
}

/// Reads a CSV file with a header row, deserializing each line into `R`.
/// Empty cells map to `None` for optional columns.
pub struct CsvSource<R> {
    pub database: String,
    pub table: String,
    path: PathBuf,
    partition_size: usize,
    _row: PhantomData<fn() -> R>,
}

impl<R> CsvSource<R> {
    pub fn new(database: &str, table: &str, path: impl Into<PathBuf>, partition_size: usize) -> Self {
        CsvSource {
            database: database.to_string(),
            table: table.to_string(),
            path: path.into(),
            partition_size: partition_size.max(1),
            _row: PhantomData,
        }
    }
}

type CsvRows<R> = csv::DeserializeRecordsIntoIter<File, R>;

fn open_rows<R: DeserializeOwned>(path: &Path) -> Result<CsvRows<R>, SourceError> {
    let reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)?;
    debug!(path = %path.display(), "Opened CSV source");
    Ok(reader.into_deserialize())
}

fn next_partition<R: DeserializeOwned>(
    rows: &mut CsvRows<R>,
    size: usize,
) -> Result<Partition<R>, SourceError> {
    let mut partition = Vec::with_capacity(size);
    while partition.len() < size {
        match rows.next() {
            Some(row) => partition.push(row?),
            None => break,
        }
    }
    Ok(partition)
}

impl<R> SourceReader<R> for CsvSource<R>
where
    R: DeserializeOwned + Send + 'static,
{
    /// Each partition is parsed on the blocking pool; the file is opened on
    /// the first poll.
    fn read(&self) -> PartitionStream<'_, R> {
        let path = self.path.clone();
        let size = self.partition_size;

        stream::try_unfold(None, move |rows: Option<CsvRows<R>>| {
            let path = path.clone();
            async move {
                let (partition, rows) = tokio::task::spawn_blocking(move || {
                    let mut rows = match rows {
                        Some(rows) => rows,
                        None => open_rows::<R>(&path)?,
                    };
                    let partition = next_partition(&mut rows, size)?;
                    Ok::<_, SourceError>((partition, rows))
                })
                .await??;

                Ok::<_, SourceError>((!partition.is_empty()).then_some((partition, Some(rows))))
            }
        })
        .boxed()
    }

    fn describe(&self) -> String {
        format!("{}.{} ({})", self.database, self.table, self.path.display())
    }
}
