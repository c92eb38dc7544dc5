//! Test utilities: an in-memory page driver and canned catalog pages

use aisle_scraper::browser_session::{
    PageDriver, ReadinessMarker, RemotePage, SessionError, SessionResult,
};
use aisle_scraper::config::{BrowserEndpoint, ScrapeConfig};
use scraper::{Html, Selector};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const ORIGIN: &str = "https://groceries.asda.com";
pub const SITEMAP: &str = "https://groceries.asda.com/sitemap";

/// Serves canned HTML by URL; unknown URLs fail navigation
#[derive(Default)]
pub struct MockDriver {
    pages: Arc<HashMap<String, String>>,
    stats: Arc<DriverStats>,
    refuse_sessions: bool,
    fetch_delay: Option<Duration>,
}

#[derive(Default)]
pub struct DriverStats {
    pub opened: AtomicUsize,
    pub closed: AtomicUsize,
    pub navigated: Mutex<Vec<String>>,
}

#[allow(dead_code)]
impl MockDriver {
    pub fn new(pages: HashMap<String, String>) -> Self {
        Self {
            pages: Arc::new(pages),
            ..Self::default()
        }
    }

    /// A driver whose endpoint refuses every session
    pub fn unreachable() -> Self {
        Self {
            refuse_sessions: true,
            ..Self::default()
        }
    }

    /// Sleep this long in every navigation
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.fetch_delay = Some(delay);
        self
    }

    pub fn stats(&self) -> Arc<DriverStats> {
        self.stats.clone()
    }

    pub fn navigated(&self) -> Vec<String> {
        self.stats.navigated.lock().unwrap().clone()
    }
}

impl PageDriver for MockDriver {
    type Page = MockPage;

    async fn open(&self) -> SessionResult<MockPage> {
        if self.refuse_sessions {
            return Err(SessionError::Connection {
                endpoint: "mock://farm".to_string(),
                message: "connection refused".to_string(),
            });
        }
        self.stats.opened.fetch_add(1, Ordering::SeqCst);
        Ok(MockPage {
            pages: self.pages.clone(),
            stats: self.stats.clone(),
            delay: self.fetch_delay,
            url: None,
        })
    }
}

pub struct MockPage {
    pages: Arc<HashMap<String, String>>,
    stats: Arc<DriverStats>,
    delay: Option<Duration>,
    url: Option<String>,
}

impl MockPage {
    fn html(&self) -> Option<&String> {
        self.url.as_ref().and_then(|u| self.pages.get(u))
    }
}

impl RemotePage for MockPage {
    async fn navigate(&mut self, url: &str) -> SessionResult<()> {
        self.stats.navigated.lock().unwrap().push(url.to_string());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if !self.pages.contains_key(url) {
            return Err(SessionError::Navigation {
                url: url.to_string(),
                message: "net::ERR_NAME_NOT_RESOLVED".to_string(),
            });
        }
        self.url = Some(url.to_string());
        Ok(())
    }

    async fn wait_for(&mut self, marker: ReadinessMarker, timeout: Duration) -> SessionResult<()> {
        let present = self
            .html()
            .is_some_and(|html| has_marker(html, marker.selector()));
        if present {
            Ok(())
        } else {
            Err(SessionError::Timeout {
                url: self.url.clone().unwrap_or_default(),
                marker: marker.selector().to_string(),
                timeout,
            })
        }
    }

    async fn read_document(&mut self) -> SessionResult<String> {
        self.html().cloned().ok_or_else(|| SessionError::Document {
            url: self.url.clone().unwrap_or_default(),
            message: "no document".to_string(),
        })
    }

    async fn close(&mut self) -> SessionResult<()> {
        self.stats.closed.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

fn has_marker(html: &str, css: &str) -> bool {
    let document = Html::parse_document(html);
    match Selector::parse(css) {
        Ok(selector) => document.select(&selector).next().is_some(),
        Err(_) => false,
    }
}

/// Config pointing both stores into `dir`
#[allow(dead_code)]
pub fn test_config(dir: &Path, workers: usize) -> ScrapeConfig {
    ScrapeConfig::builder()
        .site_origin(ORIGIN)
        .sitemap_url(SITEMAP)
        .link_store(dir.join("links.csv"))
        .record_store(dir.join("products.csv"))
        .category_workers(workers)
        .product_workers(workers)
        .shutdown_grace_secs(1)
        .endpoint(BrowserEndpoint::new("ws", "localhost", 9222))
        .build()
        .unwrap()
}

/// Listing page with the given product hrefs
///
/// `max_page`: `None` omits the pagination widget, `Some(None)` renders a
/// widget without a max-page element.
#[allow(dead_code)]
pub fn listing_page(hrefs: &[String], max_page: Option<Option<&str>>) -> String {
    let items: String = hrefs
        .iter()
        .map(|h| {
            format!(
                r#"<li class="co-item"><a class="co-product__anchor" href="{h}">item</a></li>"#
            )
        })
        .collect();

    let widget = match max_page {
        None => String::new(),
        Some(None) => r#"<div class="page-navigation"></div>"#.to_string(),
        Some(Some(max)) => format!(
            r#"<div class="page-navigation"><div class="co-pagination__max-page">{max}</div></div>"#
        ),
    };

    format!(
        r#"<html><body>
            <div class="cms-modules"><ul><li class="co-item"><a class="co-product__anchor" href="/product/promo/1">promo</a></li></ul></div>
            <div class="cms-modules"><ul>{items}</ul>{widget}</div>
        </body></html>"#
    )
}

/// Site map with one department per slice of hrefs
#[allow(dead_code)]
pub fn sitemap_page(departments: &[&[&str]]) -> String {
    let depts: String = departments
        .iter()
        .map(|links| {
            let entries: String = links
                .iter()
                .map(|l| format!(r#"<li><a href="{l}">aisle</a></li>"#))
                .collect();
            format!(r#"<div class="dept"><ul>{entries}</ul></div>"#)
        })
        .collect();
    format!(r#"<html><body><div class="cat__taxonomy">{depts}</div></body></html>"#)
}

/// Fully populated product detail page
#[allow(dead_code)]
pub fn product_page(title: &str) -> String {
    format!(
        r#"<html><body>
        <div class="pdp-breadcrumb"><a>Fresh Food</a><a>breadcrumb</a><a>Milk</a></div>
        <div class="product-detail-page__left-cntr">
            <picture><source srcset="https://ui.assets-asda.com/milk.jpg"></picture>
        </div>
        <div class="product-detail-page__main-detail-cntr">
            <div class="pdp-main-details">
                <h1 class="pdp-main-details__title"> {title} </h1>
                <div class="pdp-main-details__icons-container"><ul><li> Vegetarian </li><li>Organic</li></ul></div>
                <div class="co-product__rating pdp-main-details__rating" aria-label="4.5 stars out of 5"></div>
                <span class="co-product__review-count">(123)</span>
                <div class="pdp-main-details__price-container">
                    <strong>£1.65<span>was</span></strong>
                    <strong>£1.25 <span>offer</span></strong>
                </div>
                <span class="co-product__price-per-uom">(£0.73/litre)</span>
            </div>
            <div class="pdp-description-reviews__product-details-cntr">
                <div>Features</div><div> Semi skimmed milk </div>
            </div>
        </div>
        </body></html>"#
    )
}

/// Product page without any optional element
#[allow(dead_code)]
pub fn bare_product_page() -> String {
    r#"<html><body>
        <div class="product-detail-page__main-detail-cntr"><div class="pdp-main-details"></div></div>
    </body></html>"#
        .to_string()
}

/// Product hrefs `/product/{category}/{n}` for `range`
#[allow(dead_code)]
pub fn product_hrefs(category: &str, range: std::ops::Range<usize>) -> Vec<String> {
    range.map(|n| format!("/product/{category}/{n}")).collect()
}

/// Absolute form of [`product_hrefs`]
#[allow(dead_code)]
pub fn product_urls(category: &str, range: std::ops::Range<usize>) -> Vec<String> {
    product_hrefs(category, range)
        .into_iter()
        .map(|h| format!("{ORIGIN}{h}"))
        .collect()
}

#[allow(dead_code)]
pub fn distinct(items: &[String]) -> usize {
    items.iter().collect::<HashSet<_>>().len()
}
