//! Per-category pagination walk
//!
//! Fetches the first listing page to learn the page count, then visits every
//! numbered page and collects the product links in page-then-item order.

use scraper::Html;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use url::Url;

use super::listing::{listing_links, page_count};
use crate::browser_session::{PageDriver, ReadinessMarker, SessionTimeouts, fetch_document};
use crate::config::{PaginationAbsence, ScrapeConfig};
use crate::utils::constants::listing;
use crate::utils::page_url;

/// Readiness marker of aisle listing pages
pub const LISTING_READY: ReadinessMarker = ReadinessMarker::css(listing::READY);

/// Discover every product link of one category
///
/// A failure on the first fetch abandons the category with an empty result.
/// Failures on numbered pages are logged and skipped. The token is checked
/// before each page fetch and interrupts the fetch in flight; a cancelled
/// walk returns what it has so far.
pub async fn discover<D: PageDriver>(
    driver: &D,
    category_url: &str,
    config: &ScrapeConfig,
    cancel: &CancellationToken,
) -> Vec<String> {
    let timeouts = SessionTimeouts::from_config(config);
    let policy = config.pagination_absence();

    let first = match fetch_document(driver, category_url, LISTING_READY, timeouts, cancel).await {
        Ok(html) => html,
        Err(e) if e.is_cancelled() => {
            info!("Cancelled walk of {category_url} on its first page");
            return Vec::new();
        }
        Err(e) => {
            warn!("Abandoning category {category_url}: {e}");
            return Vec::new();
        }
    };

    let pages = pages_to_visit(&first, policy);
    if pages == 0 {
        info!("No pagination on {category_url}, nothing to discover");
        return Vec::new();
    }
    debug!("{category_url} reports {pages} listing page(s)");

    let mut links = Vec::new();
    for n in 1..=pages {
        if cancel.is_cancelled() {
            info!("Cancelled walk of {category_url} before page {n}/{pages}");
            break;
        }

        let url = match page_url(category_url, n) {
            Ok(url) => url,
            Err(e) => {
                warn!("Cannot build page {n} of {category_url}: {e}");
                continue;
            }
        };

        match fetch_document(driver, &url, LISTING_READY, timeouts, cancel).await {
            Ok(html) => {
                let found = links_on_page(&html, config.site_origin(), policy);
                info!("{url}: {} product link(s)", found.len());
                links.extend(found);
            }
            Err(e) if e.is_cancelled() => {
                info!("Cancelled walk of {category_url} on page {n}/{pages}");
                break;
            }
            Err(e) => warn!("Skipping listing page {url}: {e}"),
        }
    }

    links
}

fn pages_to_visit(html: &str, policy: PaginationAbsence) -> usize {
    let document = Html::parse_document(html);
    page_count(&document).pages_to_visit(policy)
}

fn links_on_page(html: &str, origin: &Url, policy: PaginationAbsence) -> Vec<String> {
    let document = Html::parse_document(html);
    listing_links(&document, origin, policy)
}
