//! Append-only CSV store fed by a single writer
//!
//! Workers hold cloned [`SinkHandle`]s and send rows over a bounded channel.
//! One blocking writer task owns the file, so the header is decided once at
//! open time and rows never interleave mid-record.

use serde::Serialize;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use super::errors::{SinkError, SinkResult};

/// Totals reported by the writer task once every handle is dropped
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SinkStats {
    pub path: PathBuf,
    pub rows_written: u64,
    pub header_written: bool,
}

/// Join handle of the writer task
pub type SinkTask = JoinHandle<SinkResult<SinkStats>>;

/// Sending side of a sink
pub struct SinkHandle<T> {
    tx: mpsc::Sender<T>,
    path: PathBuf,
}

impl<T> Clone for SinkHandle<T> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
            path: self.path.clone(),
        }
    }
}

impl<T: Send + 'static> SinkHandle<T> {
    /// Queue one row, waiting for channel capacity
    pub async fn append(&self, row: T) -> SinkResult<()> {
        self.tx
            .send(row)
            .await
            .map_err(|_| SinkError::Closed(self.path.clone()))
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

pub struct CsvSink;

impl CsvSink {
    /// Open `path` for appending and start its writer task
    ///
    /// The file is created if missing. The header row, taken from the
    /// serialized field names of `T`, is written only when the file is empty.
    /// The task finishes after the last handle is dropped, returning its
    /// [`SinkStats`].
    pub fn spawn<T>(path: impl AsRef<Path>, capacity: usize) -> SinkResult<(SinkHandle<T>, SinkTask)>
    where
        T: Serialize + Send + 'static,
    {
        let path = path.as_ref().to_path_buf();

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| SinkError::io(&path, e))?;
        let existing = file.metadata().map_err(|e| SinkError::io(&path, e))?.len();
        let header_written = existing == 0;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(header_written)
            .from_writer(file);

        info!(
            "Opened sink {} ({} bytes present, header {})",
            path.display(),
            existing,
            if header_written { "pending" } else { "kept" }
        );

        let (tx, mut rx) = mpsc::channel::<T>(capacity.max(1));
        let task_path = path.clone();

        let task = tokio::task::spawn_blocking(move || {
            let mut rows_written = 0u64;

            while let Some(row) = rx.blocking_recv() {
                if let Err(e) = writer.serialize(&row) {
                    error!("Sink {} rejected a row: {e}", task_path.display());
                    return Err(SinkError::csv(&task_path, e));
                }
                writer.flush().map_err(|e| SinkError::io(&task_path, e))?;
                rows_written += 1;
            }

            debug!(
                "Sink {} drained: {rows_written} row(s) written",
                task_path.display()
            );
            Ok(SinkStats {
                path: task_path,
                rows_written,
                header_written: header_written && rows_written > 0,
            })
        });

        Ok((SinkHandle { tx, path }, task))
    }
}

/// Await a writer task, folding a panicked or cancelled task into [`SinkError`]
pub async fn finish(task: SinkTask, path: &Path) -> SinkResult<SinkStats> {
    task.await.map_err(|e| SinkError::Writer {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?
}
