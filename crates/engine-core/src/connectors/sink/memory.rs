use crate::{
    connectors::sink::{Sink, SinkConnection, WriteAck},
    error::SinkError,
};
use async_trait::async_trait;
use model::records::Record;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;

#[derive(Debug)]
struct Inner<T> {
    batches: Vec<(String, Vec<T>)>,
    failing: bool,
}

/// Sink that keeps every written batch in memory.
#[derive(Debug, Clone)]
pub struct MemorySink<T> {
    inner: Arc<Mutex<Inner<T>>>,
}

impl<T: Clone> MemorySink<T> {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                batches: Vec::new(),
                failing: false,
            })),
        }
    }

    /// Makes subsequent writes fail (or succeed again).
    pub async fn set_failing(&self, failing: bool) {
        self.inner.lock().await.failing = failing;
    }

    /// Every row written so far, in write order.
    pub async fn rows(&self) -> Vec<T> {
        let inner = self.inner.lock().await;
        inner
            .batches
            .iter()
            .flat_map(|(_, rows)| rows.iter().cloned())
            .collect()
    }

    pub async fn batch_count(&self) -> usize {
        self.inner.lock().await.batches.len()
    }
}

impl<T: Clone> Default for MemorySink<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T: Record + Clone> Sink<T> for MemorySink<T> {
    async fn write_table(
        &self,
        records: &[T],
        connection: &SinkConnection,
    ) -> Result<WriteAck, SinkError> {
        let mut inner = self.inner.lock().await;
        if inner.failing {
            return Err(SinkError::Rejected(format!(
                "memory sink refused write to {}",
                connection.table
            )));
        }

        info!("writing a batch of {} rows to {}", records.len(), connection.table);
        inner
            .batches
            .push((connection.table.clone(), records.to_vec()));

        Ok(WriteAck {
            rows_written: records.len(),
        })
    }
}
