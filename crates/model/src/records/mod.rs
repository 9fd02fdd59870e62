use crate::core::watermark::Watermark;
use serde::Serialize;

pub mod row;

/// Unit of data-parallel work handed out by a source reader.
pub type Partition<R> = Vec<R>;

/// A typed row flowing through a replication run.
pub trait Record: Send + Sync + 'static {
    /// Value of the watermark column, `None` when the column is NULL.
    fn watermark(&self) -> Option<Watermark>;
}

/// A record that can be written to a target table.
///
/// `COLUMNS` lists the target columns in the same order the row serializes
/// its fields.
pub trait TableRow: Record + Serialize {
    const COLUMNS: &'static [&'static str];
}

/// Highest watermark across `records`, ignoring NULLs.
pub fn max_watermark<'a, R, I>(records: I) -> Option<Watermark>
where
    R: Record + 'a,
    I: IntoIterator<Item = &'a R>,
{
    records.into_iter().filter_map(Record::watermark).max()
}
