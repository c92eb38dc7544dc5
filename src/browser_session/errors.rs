//! Error types for remote page sessions

use std::time::Duration;
use thiserror::Error;

/// Result type alias for session operations
pub type SessionResult<T> = Result<T, SessionError>;

/// Failure modes of one page session
#[derive(Debug, Error)]
pub enum SessionError {
    /// The remote browser endpoint could not be reached or refused a session
    #[error("Cannot establish browser session at {endpoint}: {message}")]
    Connection { endpoint: String, message: String },

    /// `goto` failed or exceeded the page-load bound
    #[error("Navigation to {url} failed: {message}")]
    Navigation { url: String, message: String },

    /// The readiness marker never appeared
    #[error("Timeout after {timeout:?} waiting for '{marker}' on {url}")]
    Timeout {
        url: String,
        marker: String,
        timeout: Duration,
    },

    /// The rendered document could not be read back
    #[error("Failed to read document from {url}: {message}")]
    Document { url: String, message: String },

    /// The run was cancelled while the fetch was in flight
    #[error("Fetch of {url} cancelled")]
    Cancelled { url: String },

    /// Closing the page or the browser connection failed
    #[error("Failed to close session: {0}")]
    Close(String),
}

impl SessionError {
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, SessionError::Timeout { .. })
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, SessionError::Cancelled { .. })
    }

    #[must_use]
    pub fn is_connection(&self) -> bool {
        matches!(self, SessionError::Connection { .. })
    }
}
