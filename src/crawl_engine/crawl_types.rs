//! Core types for the two scrape stages.
//!
//! Stage identities, the per-stage report and the error type surfaced by
//! stage coordinators.

use std::fmt;
use std::time::Duration;
use thiserror::Error;

use super::worker_pool::PoolSummary;
use crate::browser_session::SessionError;
use crate::sink::SinkError;

/// Errors that end a stage
///
/// Per-item failures never appear here; they are logged by the worker that
/// owns the item.
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// The browser endpoint could not provide a session
    #[error("Browser endpoint unusable: {0}")]
    Session(#[from] SessionError),

    /// The site map could not be fetched
    #[error("Site map unavailable: {0}")]
    SiteMap(#[source] SessionError),

    #[error(transparent)]
    Sink(#[from] SinkError),

    /// The run was interrupted before the stage finished
    #[error("Scrape cancelled")]
    Cancelled,
}

/// Convenience alias for Result with `ScrapeError`
pub type ScrapeResult<T> = Result<T, ScrapeError>;

/// Pipeline stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Site map and category listings into the link store
    Discovery,
    /// Product pages into the record store
    Extraction,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Discovery => write!(f, "discovery"),
            Self::Extraction => write!(f, "extraction"),
        }
    }
}

/// Outcome of one stage run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageReport {
    pub stage: Stage,
    /// Items partitioned across workers (categories or product links)
    pub inputs: usize,
    /// Rows the sink wrote
    pub rows_written: u64,
    pub pool: PoolSummary,
    pub elapsed: Duration,
}

impl StageReport {
    #[must_use]
    pub fn cancelled(&self) -> bool {
        self.pool.cancelled
    }
}
