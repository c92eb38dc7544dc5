//! Getter methods for `ScrapeConfig`

use std::path::PathBuf;
use url::Url;

use super::types::{BrowserEndpoint, PaginationAbsence, ScrapeConfig};

impl ScrapeConfig {
    #[must_use]
    pub fn endpoint(&self) -> &BrowserEndpoint {
        &self.endpoint
    }

    #[must_use]
    pub fn site_origin(&self) -> &Url {
        &self.site_origin
    }

    #[must_use]
    pub fn site_label(&self) -> &str {
        &self.site_label
    }

    #[must_use]
    pub fn sitemap_url(&self) -> &str {
        &self.sitemap_url
    }

    #[must_use]
    pub fn link_store(&self) -> &PathBuf {
        &self.link_store
    }

    #[must_use]
    pub fn record_store(&self) -> &PathBuf {
        &self.record_store
    }

    #[must_use]
    pub fn category_workers(&self) -> usize {
        self.category_workers
    }

    #[must_use]
    pub fn product_workers(&self) -> usize {
        self.product_workers
    }

    #[must_use]
    pub fn readiness_timeout_secs(&self) -> u64 {
        self.readiness_timeout_secs
    }

    #[must_use]
    pub fn page_load_timeout_secs(&self) -> u64 {
        self.page_load_timeout_secs
    }

    #[must_use]
    pub fn pagination_absence(&self) -> PaginationAbsence {
        self.pagination_absence
    }

    #[must_use]
    pub fn sink_capacity(&self) -> usize {
        self.sink_capacity
    }

    #[must_use]
    pub fn shutdown_grace_secs(&self) -> u64 {
        self.shutdown_grace_secs
    }
}
