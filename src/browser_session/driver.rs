//! Narrow browser capability interface and the scoped page fetch
//!
//! Pipeline code never talks to a browser backend directly. It asks a
//! [`PageDriver`] for a fresh [`RemotePage`] and hands both to
//! [`fetch_document`], which owns the page for the duration of one fetch and
//! closes it on every exit path.

use std::future::Future;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::errors::{SessionError, SessionResult};
use super::page_timeout::with_page_timeout;
use crate::config::ScrapeConfig;

/// DOM condition that signals a page has rendered enough to be scraped
///
/// The condition is "an element matching this CSS selector is present".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadinessMarker(&'static str);

impl ReadinessMarker {
    #[must_use]
    pub const fn css(selector: &'static str) -> Self {
        Self(selector)
    }

    #[must_use]
    pub const fn selector(&self) -> &'static str {
        self.0
    }
}

/// Time bounds applied to every fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionTimeouts {
    /// Bound on waiting for the readiness marker
    pub readiness: Duration,
    /// Bound on navigation itself
    pub page_load: Duration,
}

impl SessionTimeouts {
    #[must_use]
    pub fn from_config(config: &ScrapeConfig) -> Self {
        Self {
            readiness: config.readiness_timeout(),
            page_load: config.page_load_timeout(),
        }
    }
}

/// One browser-controlled page
pub trait RemotePage: Send {
    /// Navigate to `url` and wait for the load to commit
    fn navigate(&mut self, url: &str) -> impl Future<Output = SessionResult<()>> + Send;

    /// Block until `marker` is present, failing with a timeout after `timeout`
    fn wait_for(
        &mut self,
        marker: ReadinessMarker,
        timeout: Duration,
    ) -> impl Future<Output = SessionResult<()>> + Send;

    /// Full rendered document as HTML
    fn read_document(&mut self) -> impl Future<Output = SessionResult<String>> + Send;

    /// Tear the page (and its session) down
    ///
    /// Must be safe to call on a page whose navigation failed.
    fn close(&mut self) -> impl Future<Output = SessionResult<()>> + Send;
}

/// Source of fresh pages
pub trait PageDriver: Send + Sync {
    type Page: RemotePage;

    /// Open a fresh page. Failure here is a connection failure.
    fn open(&self) -> impl Future<Output = SessionResult<Self::Page>> + Send;

    /// Establish and tear down one session to prove the endpoint is usable
    fn probe(&self) -> impl Future<Output = SessionResult<()>> + Send {
        async move {
            let mut page = self.open().await?;
            page.close().await
        }
    }
}

/// Fetch `url` through a fresh page and return its rendered document
///
/// The page is closed before this returns, whether the fetch succeeded,
/// timed out, failed or was cancelled. Cancellation interrupts navigation
/// and the readiness wait with [`SessionError::Cancelled`]. A close failure
/// is logged and does not mask the fetch outcome. There is no retry at this
/// layer.
pub async fn fetch_document<D: PageDriver>(
    driver: &D,
    url: &str,
    marker: ReadinessMarker,
    timeouts: SessionTimeouts,
    cancel: &CancellationToken,
) -> SessionResult<String> {
    if cancel.is_cancelled() {
        return Err(SessionError::Cancelled { url: url.to_string() });
    }

    let mut page = driver.open().await?;

    let outcome = tokio::select! {
        outcome = load_document(&mut page, url, marker, timeouts) => outcome,
        () = cancel.cancelled() => {
            debug!("Fetch of {url} cancelled, closing its page");
            Err(SessionError::Cancelled { url: url.to_string() })
        }
    };

    if let Err(e) = page.close().await {
        warn!("Failed to close page for {url}: {e}");
    }

    outcome
}

async fn load_document<P: RemotePage>(
    page: &mut P,
    url: &str,
    marker: ReadinessMarker,
    timeouts: SessionTimeouts,
) -> SessionResult<String> {
    debug!("Navigating to {url}");
    with_page_timeout(page.navigate(url), timeouts.page_load, url, "Page navigation").await?;

    page.wait_for(marker, timeouts.readiness).await?;

    let html = page.read_document().await?;
    debug!("Read {} bytes from {url}", html.len());
    Ok(html)
}
