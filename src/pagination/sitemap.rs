//! Site map reader
//!
//! The site map enumerates the category taxonomy by department. Where a
//! department offers a "view all" listing only that one is kept, since it
//! already covers the narrower aisles next to it.

use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};
use url::Url;

use crate::browser_session::{
    PageDriver, ReadinessMarker, SessionResult, SessionTimeouts, fetch_document,
};
use crate::config::ScrapeConfig;
use crate::page_extractor::fields::selector;
use crate::utils::constants::sitemap;
use crate::utils::resolve_href;

pub const SITEMAP_READY: ReadinessMarker = ReadinessMarker::css(sitemap::READY);

static TAXONOMY: Lazy<Selector> = Lazy::new(|| selector(sitemap::TAXONOMY));
static DEPARTMENT: Lazy<Selector> = Lazy::new(|| selector(sitemap::DEPARTMENT));
static ENTRY: Lazy<Selector> = Lazy::new(|| selector(sitemap::ENTRY));
static ANCHOR: Lazy<Selector> = Lazy::new(|| selector("a"));

/// Category links listed on a site map document, in document order
#[must_use]
pub fn category_links(html: &str, origin: &Url) -> Vec<String> {
    let document = Html::parse_document(html);
    let mut categories = Vec::new();

    for taxonomy in document.select(&TAXONOMY) {
        for dept in taxonomy.select(&DEPARTMENT) {
            let links: Vec<String> = dept
                .select(&ENTRY)
                .filter_map(|entry| entry.select(&ANCHOR).next())
                .filter_map(|a| a.value().attr("href"))
                .filter_map(|href| resolve_href(origin, href))
                .collect();

            match links.iter().find(|l| l.contains(sitemap::VIEW_ALL_TOKEN)) {
                Some(view_all) => categories.push(view_all.clone()),
                None => categories.extend(links),
            }
        }
    }

    categories
}

/// Fetch the configured site map and read its category links
///
/// Any session failure is returned to the caller; without a site map there
/// is nothing to crawl.
pub async fn fetch_category_links<D: PageDriver>(
    driver: &D,
    config: &ScrapeConfig,
    cancel: &CancellationToken,
) -> SessionResult<Vec<String>> {
    let timeouts = SessionTimeouts::from_config(config);
    debug!("Fetching site map {}", config.sitemap_url());

    let html =
        fetch_document(driver, config.sitemap_url(), SITEMAP_READY, timeouts, cancel).await?;
    let categories = category_links(&html, config.site_origin());

    info!(
        "Site map {} lists {} categories",
        config.sitemap_url(),
        categories.len()
    );
    Ok(categories)
}
