use model::records::row::SourceRow;
use std::{fs::OpenOptions, path::Path};

pub fn source_row(id: i64, old_column: Option<&str>, time_stamp: Option<i64>) -> SourceRow {
    SourceRow {
        id,
        old_column: old_column.map(str::to_string),
        time_stamp,
    }
}

/// Rows `[5, 10, 15]` used by the basic scenario.
pub fn initial_rows() -> Vec<SourceRow> {
    vec![
        source_row(1, Some("a"), Some(5)),
        source_row(2, Some("something"), Some(10)),
        source_row(3, Some("c"), Some(15)),
    ]
}

/// Rewrites the CSV export at `path` with a header and `rows`.
pub fn write_source_csv(path: &Path, rows: &[SourceRow]) -> Result<(), csv::Error> {
    let mut writer = csv::Writer::from_path(path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Appends `rows` to an existing export, leaving its header alone.
pub fn append_source_csv(path: &Path, rows: &[SourceRow]) -> Result<(), csv::Error> {
    let file = OpenOptions::new().append(true).open(path)?;
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(file);
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}
