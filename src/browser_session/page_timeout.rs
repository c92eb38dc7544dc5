//! Timeout utilities for page operations
//!
//! Provides async timeout wrappers to prevent indefinite hangs during
//! page navigation and other browser operations.

use std::future::Future;
use std::time::Duration;

use super::errors::{SessionError, SessionResult};

/// Wrap a navigation-type page operation with an explicit timeout
///
/// An elapsed timeout is reported as [`SessionError::Navigation`] so it is
/// distinguishable from a readiness-marker timeout.
///
/// # Arguments
/// * `operation` - The async Future to execute with a timeout
/// * `timeout` - Upper bound for the operation
/// * `url` - Page URL for the error message
/// * `operation_name` - Human-readable name for error messages
pub async fn with_page_timeout<F, T>(
    operation: F,
    timeout: Duration,
    url: &str,
    operation_name: &str,
) -> SessionResult<T>
where
    F: Future<Output = SessionResult<T>>,
{
    match tokio::time::timeout(timeout, operation).await {
        Ok(result) => result,
        Err(_) => Err(SessionError::Navigation {
            url: url.to_string(),
            message: format!("{operation_name} timeout after {} seconds", timeout.as_secs()),
        }),
    }
}
