//! Shared configuration constants for aisle_scraper
//!
//! Default values and DOM selectors used throughout the codebase, kept in
//! one place to avoid magic strings in the pipeline code.

/// Site origin every relative href is resolved against
pub const DEFAULT_SITE_ORIGIN: &str = "https://groceries.asda.com";

/// Label written to the `source` column of every product record
pub const DEFAULT_SITE_LABEL: &str = "ASDA";

/// Catalog site map enumerating the category taxonomy
pub const DEFAULT_SITEMAP_URL: &str = "https://groceries.asda.com/sitemap";

/// Stage 1 output / Stage 2 input
pub const DEFAULT_LINK_STORE: &str = "asda_product_links.csv";

/// Stage 2 output
pub const DEFAULT_RECORD_STORE: &str = "asda_products.csv";

/// Parallel workers walking category pages
pub const DEFAULT_CATEGORY_WORKERS: usize = 6;

/// Parallel workers extracting product pages
pub const DEFAULT_PRODUCT_WORKERS: usize = 10;

/// Bounded wait for a readiness marker, in seconds
pub const DEFAULT_READINESS_TIMEOUT_SECS: u64 = 3;

/// Bound on `page.goto()`, in seconds
pub const DEFAULT_PAGE_LOAD_TIMEOUT_SECS: u64 = 30;

/// Rows buffered between workers and the sink writer
pub const DEFAULT_SINK_CAPACITY: usize = 256;

/// How long cancelled workers get to wind down before they are aborted
pub const DEFAULT_SHUTDOWN_GRACE_SECS: u64 = 10;

/// Interval between readiness marker polls
pub const READINESS_POLL_INTERVAL_MS: u64 = 100;

/// Timestamp format of the `last_updated` column
pub const LAST_UPDATED_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

/// Site map DOM
pub mod sitemap {
    pub const READY: &str = ".cat__taxonomy";
    pub const TAXONOMY: &str = "div.cat__taxonomy";
    pub const DEPARTMENT: &str = "div.dept";
    pub const ENTRY: &str = "li";
    pub const VIEW_ALL_TOKEN: &str = "/view-all";
}

/// Aisle listing DOM
pub mod listing {
    pub const READY: &str = ".cms-modules";
    pub const MODULE: &str = "div.cms-modules";
    pub const PAGINATION: &str = "div.page-navigation";
    pub const MAX_PAGE: &str = "div.co-pagination__max-page";
    pub const ITEM: &str = "li.co-item";
    pub const ITEM_ANCHOR: &str = "a.co-product__anchor";
}

/// Product detail DOM
pub mod product {
    pub const READY: &str = ".pdp-main-details";
    pub const REGION: &str = "div.product-detail-page__main-detail-cntr";
    pub const TITLE: &str = "h1.pdp-main-details__title";
    pub const IMAGE: &str = "div.product-detail-page__left-cntr picture source";
    pub const BREADCRUMB: &str = "div.pdp-breadcrumb";
    pub const TAGS: &str = "div.pdp-main-details__icons-container";
    pub const REVIEW_COUNT: &str = "span.co-product__review-count";
    pub const RATING: &str = "div.co-product__rating.pdp-main-details__rating";
    pub const UNIT_PRICE: &str = "span.co-product__price-per-uom";
    pub const PRICE_CONTAINER: &str = "div.pdp-main-details__price-container";
    pub const PRICE_NOISE: &str = "span";
    pub const DESCRIPTION_SECTION: &str = "div.pdp-description-reviews__product-details-cntr";
    pub const DESCRIPTION_HEADING: &str = "Features";
}
