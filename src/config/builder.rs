//! Type-safe builder for `ScrapeConfig` using the typestate pattern
//!
//! The remote browser endpoint is the only required field; `build()` is
//! available once it has been supplied.

use anyhow::{Result, anyhow};
use std::marker::PhantomData;
use std::path::PathBuf;
use url::Url;

use super::types::{BrowserEndpoint, PaginationAbsence, ScrapeConfig};
use crate::utils::{
    DEFAULT_CATEGORY_WORKERS, DEFAULT_LINK_STORE, DEFAULT_PAGE_LOAD_TIMEOUT_SECS,
    DEFAULT_PRODUCT_WORKERS, DEFAULT_READINESS_TIMEOUT_SECS, DEFAULT_RECORD_STORE,
    DEFAULT_SHUTDOWN_GRACE_SECS, DEFAULT_SINK_CAPACITY, DEFAULT_SITE_LABEL, DEFAULT_SITE_ORIGIN,
    DEFAULT_SITEMAP_URL,
};

// Type states for the builder
pub struct WithEndpoint;

pub struct ScrapeConfigBuilder<State = ()> {
    pub(crate) endpoint: Option<BrowserEndpoint>,
    pub(crate) site_origin: String,
    pub(crate) site_label: String,
    pub(crate) sitemap_url: String,
    pub(crate) link_store: PathBuf,
    pub(crate) record_store: PathBuf,
    pub(crate) category_workers: usize,
    pub(crate) product_workers: usize,
    pub(crate) readiness_timeout_secs: u64,
    pub(crate) page_load_timeout_secs: u64,
    pub(crate) pagination_absence: PaginationAbsence,
    pub(crate) sink_capacity: usize,
    pub(crate) shutdown_grace_secs: u64,
    pub(crate) _phantom: PhantomData<State>,
}

impl Default for ScrapeConfigBuilder<()> {
    fn default() -> Self {
        Self {
            endpoint: None,
            site_origin: DEFAULT_SITE_ORIGIN.to_string(),
            site_label: DEFAULT_SITE_LABEL.to_string(),
            sitemap_url: DEFAULT_SITEMAP_URL.to_string(),
            link_store: PathBuf::from(DEFAULT_LINK_STORE),
            record_store: PathBuf::from(DEFAULT_RECORD_STORE),
            category_workers: DEFAULT_CATEGORY_WORKERS,
            product_workers: DEFAULT_PRODUCT_WORKERS,
            readiness_timeout_secs: DEFAULT_READINESS_TIMEOUT_SECS,
            page_load_timeout_secs: DEFAULT_PAGE_LOAD_TIMEOUT_SECS,
            pagination_absence: PaginationAbsence::default(),
            sink_capacity: DEFAULT_SINK_CAPACITY,
            shutdown_grace_secs: DEFAULT_SHUTDOWN_GRACE_SECS,
            _phantom: PhantomData,
        }
    }
}

impl ScrapeConfig {
    /// Create a builder for configuring a `ScrapeConfig` with a fluent interface
    #[must_use]
    pub fn builder() -> ScrapeConfigBuilder<()> {
        ScrapeConfigBuilder::default()
    }
}

impl ScrapeConfigBuilder<()> {
    pub fn endpoint(self, endpoint: BrowserEndpoint) -> ScrapeConfigBuilder<WithEndpoint> {
        ScrapeConfigBuilder {
            endpoint: Some(endpoint),
            site_origin: self.site_origin,
            site_label: self.site_label,
            sitemap_url: self.sitemap_url,
            link_store: self.link_store,
            record_store: self.record_store,
            category_workers: self.category_workers,
            product_workers: self.product_workers,
            readiness_timeout_secs: self.readiness_timeout_secs,
            page_load_timeout_secs: self.page_load_timeout_secs,
            pagination_absence: self.pagination_absence,
            sink_capacity: self.sink_capacity,
            shutdown_grace_secs: self.shutdown_grace_secs,
            _phantom: PhantomData,
        }
    }
}

// Build method only available when the endpoint is set
impl ScrapeConfigBuilder<WithEndpoint> {
    pub fn build(self) -> Result<ScrapeConfig> {
        let site_origin = Url::parse(&self.site_origin)
            .map_err(|e| anyhow!("Invalid site origin '{}': {e}", self.site_origin))?;
        if !matches!(site_origin.scheme(), "http" | "https") || site_origin.host_str().is_none() {
            return Err(anyhow!(
                "Site origin must be an absolute http(s) URL: {}",
                self.site_origin
            ));
        }

        Url::parse(&self.sitemap_url)
            .map_err(|e| anyhow!("Invalid site map URL '{}': {e}", self.sitemap_url))?;

        if self.sink_capacity == 0 {
            return Err(anyhow!("sink_capacity must be at least 1"));
        }

        if self.readiness_timeout_secs == 0 {
            return Err(anyhow!("readiness_timeout_secs must be at least 1"));
        }

        Ok(ScrapeConfig {
            endpoint: self
                .endpoint
                .ok_or_else(|| anyhow!("endpoint is required"))?,
            site_origin,
            site_label: self.site_label,
            sitemap_url: self.sitemap_url,
            link_store: self.link_store,
            record_store: self.record_store,
            // Zero workers would never run anything; clamp to serial execution
            category_workers: self.category_workers.max(1),
            product_workers: self.product_workers.max(1),
            readiness_timeout_secs: self.readiness_timeout_secs,
            page_load_timeout_secs: self.page_load_timeout_secs.max(1),
            pagination_absence: self.pagination_absence,
            sink_capacity: self.sink_capacity,
            shutdown_grace_secs: self.shutdown_grace_secs,
        })
    }
}

// Builder methods available at any state
impl<State> ScrapeConfigBuilder<State> {
    #[must_use]
    pub fn site_origin(mut self, origin: impl Into<String>) -> Self {
        self.site_origin = origin.into();
        self
    }

    #[must_use]
    pub fn site_label(mut self, label: impl Into<String>) -> Self {
        self.site_label = label.into();
        self
    }

    #[must_use]
    pub fn sitemap_url(mut self, url: impl Into<String>) -> Self {
        self.sitemap_url = url.into();
        self
    }

    #[must_use]
    pub fn link_store(mut self, path: impl Into<PathBuf>) -> Self {
        self.link_store = path.into();
        self
    }

    #[must_use]
    pub fn record_store(mut self, path: impl Into<PathBuf>) -> Self {
        self.record_store = path.into();
        self
    }

    #[must_use]
    pub fn category_workers(mut self, workers: usize) -> Self {
        self.category_workers = workers;
        self
    }

    #[must_use]
    pub fn product_workers(mut self, workers: usize) -> Self {
        self.product_workers = workers;
        self
    }

    /// Set the bounded wait for readiness markers
    ///
    /// This is the only suspension point per page besides navigation, so it
    /// effectively paces each worker.
    ///
    /// # Example
    /// ```rust
    /// # use aisle_scraper::config::{BrowserEndpoint, ScrapeConfig};
    /// # fn main() -> anyhow::Result<()> {
    /// let config = ScrapeConfig::builder()
    ///     .endpoint(BrowserEndpoint::new("ws", "127.0.0.1", 9222))
    ///     .readiness_timeout_secs(5)
    ///     .build()?;
    /// assert_eq!(config.readiness_timeout().as_secs(), 5);
    /// # Ok(())
    /// # }
    /// ```
    #[must_use]
    pub fn readiness_timeout_secs(mut self, secs: u64) -> Self {
        self.readiness_timeout_secs = secs;
        self
    }

    #[must_use]
    pub fn page_load_timeout_secs(mut self, secs: u64) -> Self {
        self.page_load_timeout_secs = secs;
        self
    }

    #[must_use]
    pub fn pagination_absence(mut self, policy: PaginationAbsence) -> Self {
        self.pagination_absence = policy;
        self
    }

    #[must_use]
    pub fn sink_capacity(mut self, capacity: usize) -> Self {
        self.sink_capacity = capacity;
        self
    }

    #[must_use]
    pub fn shutdown_grace_secs(mut self, secs: u64) -> Self {
        self.shutdown_grace_secs = secs;
        self
    }
}
