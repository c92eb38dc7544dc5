//! Chrome DevTools Protocol backend for the remote browser farm
//!
//! Each [`ChromiumDriver::open`] connects a new CDP session to the farm
//! endpoint and opens one tab in it, so every fetch runs in a fresh browser
//! session. Closing the page closes the tab and then drops the connection by
//! stopping the CDP handler task. The remote browser itself is never sent
//! `Browser.close`: other workers may share it.

use chromiumoxide::browser::Browser;
use chromiumoxide::page::Page;
use futures::StreamExt;
use std::time::{Duration, Instant};
use tokio::task::{self, JoinHandle};
use tracing::{debug, error, trace, warn};

use super::driver::{PageDriver, ReadinessMarker, RemotePage};
use super::errors::{SessionError, SessionResult};
use crate::config::BrowserEndpoint;
use crate::utils::READINESS_POLL_INTERVAL_MS;

/// Driver connecting to a remote browser pool over CDP
#[derive(Debug, Clone)]
pub struct ChromiumDriver {
    endpoint: BrowserEndpoint,
}

impl ChromiumDriver {
    #[must_use]
    pub fn new(endpoint: BrowserEndpoint) -> Self {
        Self { endpoint }
    }

    #[must_use]
    pub fn endpoint(&self) -> &BrowserEndpoint {
        &self.endpoint
    }

    fn connection_error(&self, message: impl Into<String>) -> SessionError {
        SessionError::Connection {
            endpoint: self.endpoint.to_string(),
            message: message.into(),
        }
    }
}

impl PageDriver for ChromiumDriver {
    type Page = ChromiumPage;

    async fn open(&self) -> SessionResult<ChromiumPage> {
        let url = self
            .endpoint
            .connect_url()
            .map_err(|e| self.connection_error(e.to_string()))?;
        let (browser, mut handler) = Browser::connect(url)
            .await
            .map_err(|e| self.connection_error(e.to_string()))?;

        let handler_task = task::spawn(async move {
            while let Some(h) = handler.next().await {
                if let Err(e) = h {
                    let error_msg = e.to_string();

                    // Chrome emits CDP events chromiumoxide has no variant for
                    let is_benign_serialization_error = error_msg
                        .contains("data did not match any variant of untagged enum Message")
                        || error_msg.contains("Failed to deserialize WS response");

                    if is_benign_serialization_error {
                        trace!("Suppressed benign CDP serialization error: {}", error_msg);
                    } else {
                        error!("Browser handler error: {:?}", e);
                    }
                }
            }
            debug!("Browser handler task completed");
        });

        let page = match browser.new_page("about:blank").await {
            Ok(page) => page,
            Err(e) => {
                handler_task.abort();
                return Err(self.connection_error(format!("Failed to open page: {e}")));
            }
        };

        Ok(ChromiumPage {
            _browser: browser,
            page,
            handler: handler_task,
            current_url: String::from("about:blank"),
            closed: false,
        })
    }
}

/// One tab in its own remote browser session
///
/// Dropping an unclosed page aborts the CDP handler, which drops the
/// websocket; the farm reclaims the session when the connection goes away.
pub struct ChromiumPage {
    // Holds the connection's command channel open until the page is dropped
    _browser: Browser,
    page: Page,
    handler: JoinHandle<()>,
    current_url: String,
    closed: bool,
}

impl RemotePage for ChromiumPage {
    async fn navigate(&mut self, url: &str) -> SessionResult<()> {
        self.current_url = url.to_string();
        self.page
            .goto(url)
            .await
            .map_err(|e| SessionError::Navigation {
                url: url.to_string(),
                message: e.to_string(),
            })?;
        Ok(())
    }

    async fn wait_for(&mut self, marker: ReadinessMarker, timeout: Duration) -> SessionResult<()> {
        let start = Instant::now();
        let poll_interval = Duration::from_millis(READINESS_POLL_INTERVAL_MS);

        loop {
            match self.page.find_element(marker.selector()).await {
                Ok(_) => {
                    trace!(
                        "Marker '{}' present after {:?} on {}",
                        marker.selector(),
                        start.elapsed(),
                        self.current_url
                    );
                    return Ok(());
                }
                Err(_) if start.elapsed() >= timeout => {
                    return Err(SessionError::Timeout {
                        url: self.current_url.clone(),
                        marker: marker.selector().to_string(),
                        timeout,
                    });
                }
                Err(_) => tokio::time::sleep(poll_interval).await,
            }
        }
    }

    async fn read_document(&mut self) -> SessionResult<String> {
        self.page
            .content()
            .await
            .map_err(|e| SessionError::Document {
                url: self.current_url.clone(),
                message: e.to_string(),
            })
    }

    async fn close(&mut self) -> SessionResult<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;

        let page_closed = self.page.clone().close().await;
        self.handler.abort();

        page_closed.map_err(|e| SessionError::Close(format!("page close failed: {e}")))
    }
}

impl Drop for ChromiumPage {
    fn drop(&mut self) {
        if !self.closed {
            warn!(
                "ChromiumPage for {} dropped without close - aborting handler task",
                self.current_url
            );
            self.handler.abort();
        }
    }
}
