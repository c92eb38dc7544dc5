//! Error types for the durable sinks

use std::path::PathBuf;
use thiserror::Error;

pub type SinkResult<T> = Result<T, SinkError>;

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error on {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// The writer task has stopped and no longer accepts rows
    #[error("Sink for {0} is closed")]
    Closed(PathBuf),

    #[error("Sink writer task for {path} failed: {message}")]
    Writer { path: PathBuf, message: String },
}

impl SinkError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn csv(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        Self::Csv {
            path: path.into(),
            source,
        }
    }
}
