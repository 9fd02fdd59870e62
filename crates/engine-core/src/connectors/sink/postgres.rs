use crate::{
    connectors::{
        postgres::{connect_client, quote_ident, quote_qualified},
        sink::{Sink, SinkConnection, WriteAck},
    },
    error::SinkError,
};
use async_trait::async_trait;
use bytes::Bytes;
use futures::{SinkExt, pin_mut};
use model::records::TableRow;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tokio_postgres::Client;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Loads slices into a Postgres table.
///
/// Rows are first written to a CSV file in the staging directory, streamed
/// with `COPY` into a temporary table and then inserted into the target, all
/// inside one transaction: a slice lands completely or not at all.
pub struct PostgresSink {
    client: Mutex<Client>,
}

impl PostgresSink {
    pub async fn connect(connection: &SinkConnection) -> Result<Self, SinkError> {
        let client = connect_client(&connection.connection, Some(&connection.database)).await?;
        Ok(Self::new(client))
    }

    pub fn new(client: Client) -> Self {
        Self {
            client: Mutex::new(client),
        }
    }

    fn staging_path(staging_dir: &Path) -> PathBuf {
        staging_dir.join(format!("tidemark_stage_{}.csv", Uuid::new_v4().simple()))
    }

    async fn load_staged<T: TableRow>(
        &self,
        payload: Bytes,
        connection: &SinkConnection,
    ) -> Result<u64, SinkError> {
        let target = quote_qualified(&connection.table)
            .ok_or_else(|| SinkError::InvalidIdentifier(connection.table.clone()))?;
        let staging_table = quote_ident(&format!("__tidemark_stage_{}", Uuid::new_v4().simple()));
        let columns = T::COLUMNS
            .iter()
            .map(|c| quote_ident(c))
            .collect::<Vec<_>>()
            .join(", ");

        let mut client = self.client.lock().await;
        let tx = client.transaction().await?;

        tx.batch_execute(&format!(
            "CREATE TEMP TABLE {staging_table} (LIKE {target} INCLUDING DEFAULTS) ON COMMIT DROP"
        ))
        .await?;

        let copy = tx
            .copy_in::<_, Bytes>(&format!(
                "COPY {staging_table} ({columns}) FROM STDIN WITH (FORMAT csv, HEADER true)"
            ))
            .await?;
        pin_mut!(copy);
        copy.send(payload).await?;
        let staged = copy.as_mut().finish().await?;
        debug!(rows = staged, table = %staging_table, "Staged rows");

        let inserted = tx
            .execute(
                &format!("INSERT INTO {target} ({columns}) SELECT {columns} FROM {staging_table}"),
                &[],
            )
            .await?;
        tx.commit().await?;

        Ok(inserted)
    }
}

/// Encodes `records` as CSV with a header row.
fn encode_staging<T: TableRow>(records: &[T]) -> Result<Vec<u8>, SinkError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for record in records {
        writer.serialize(record)?;
    }
    writer.into_inner().map_err(|e| SinkError::Io(e.into_error()))
}

#[async_trait]
impl<T: TableRow> Sink<T> for PostgresSink {
    async fn write_table(
        &self,
        records: &[T],
        connection: &SinkConnection,
    ) -> Result<WriteAck, SinkError> {
        if records.is_empty() {
            return Ok(WriteAck { rows_written: 0 });
        }

        tokio::fs::create_dir_all(&connection.staging_dir).await?;
        let staging_file = Self::staging_path(&connection.staging_dir);
        let payload = Bytes::from(encode_staging(records)?);
        let result = match tokio::fs::write(&staging_file, &payload).await {
            Ok(()) => self.load_staged::<T>(payload, connection).await,
            Err(err) => Err(err.into()),
        };

        if let Err(err) = tokio::fs::remove_file(&staging_file).await {
            warn!(%err, file = %staging_file.display(), "Failed to remove staging file");
        }

        let inserted = result?;
        info!(
            table = %connection.table,
            database = %connection.database,
            rows = inserted,
            "Loaded slice into target"
        );

        Ok(WriteAck {
            rows_written: inserted as usize,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use model::records::row::TargetRow;

    #[test]
    fn staging_file_has_header_in_column_order() {
        let rows = vec![
            TargetRow {
                id: 1,
                old_column: Some("something".into()),
                new_column: Some("new_something".into()),
                time_stamp: Some(5),
            },
            TargetRow {
                id: 2,
                old_column: None,
                new_column: None,
                time_stamp: Some(10),
            },
        ];

        let contents = String::from_utf8(encode_staging(&rows).unwrap()).unwrap();
        let lines = contents.lines().collect::<Vec<_>>();
        assert_eq!(lines[0], TargetRow::COLUMNS.join(","));
        assert_eq!(lines[1], "1,something,new_something,5");
        assert_eq!(lines[2], "2,,,10");
    }

    #[test]
    fn staging_files_are_unique() {
        let dir = Path::new("/tmp");
        assert_ne!(
            PostgresSink::staging_path(dir),
            PostgresSink::staging_path(dir)
        );
    }
}
