//! Pagination walker and site map reader over an in-memory driver

use aisle_scraper::config::{PaginationAbsence, ScrapeConfig};
use aisle_scraper::pagination::{discover, fetch_category_links};
use aisle_scraper::BrowserEndpoint;
use std::collections::HashMap;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

mod common;
use common::{MockDriver, listing_page, product_hrefs, product_urls};

const CATEGORY: &str = "https://groceries.asda.com/aisle/fresh/milk";

fn page(n: usize) -> String {
    format!("{CATEGORY}?page={n}")
}

#[tokio::test]
async fn test_three_pages_of_twenty() {
    let dir = TempDir::new().unwrap();
    let config = common::test_config(dir.path(), 6);

    let mut pages = HashMap::new();
    pages.insert(
        CATEGORY.to_string(),
        listing_page(&product_hrefs("milk", 0..20), Some(Some("3"))),
    );
    for n in 1..=3 {
        let range = (n - 1) * 20..n * 20;
        pages.insert(
            page(n),
            listing_page(&product_hrefs("milk", range), Some(Some("3"))),
        );
    }
    let driver = MockDriver::new(pages);

    let links = discover(&driver, CATEGORY, &config, &CancellationToken::new()).await;

    assert_eq!(links, product_urls("milk", 0..60));
    assert_eq!(
        driver.navigated(),
        vec![CATEGORY.to_string(), page(1), page(2), page(3)]
    );
}

#[tokio::test]
async fn test_max_page_one_visits_one_page() {
    let dir = TempDir::new().unwrap();
    let config = common::test_config(dir.path(), 1);
    let listing = listing_page(&product_hrefs("milk", 0..5), Some(Some("1")));
    let driver = MockDriver::new(HashMap::from([
        (CATEGORY.to_string(), listing.clone()),
        (page(1), listing),
    ]));

    let links = discover(&driver, CATEGORY, &config, &CancellationToken::new()).await;

    assert_eq!(links.len(), 5);
    assert_eq!(driver.navigated(), vec![CATEGORY.to_string(), page(1)]);
}

#[tokio::test]
async fn test_widget_without_max_page_defaults_to_one() {
    let dir = TempDir::new().unwrap();
    let config = common::test_config(dir.path(), 1);
    let listing = listing_page(&product_hrefs("milk", 0..4), Some(None));
    let driver = MockDriver::new(HashMap::from([
        (CATEGORY.to_string(), listing.clone()),
        (page(1), listing),
    ]));

    let links = discover(&driver, CATEGORY, &config, &CancellationToken::new()).await;

    assert_eq!(links, product_urls("milk", 0..4));
    assert_eq!(driver.navigated().len(), 2);
}

#[tokio::test]
async fn test_no_widget_yields_nothing_by_default() {
    let dir = TempDir::new().unwrap();
    let config = common::test_config(dir.path(), 1);
    let driver = MockDriver::new(HashMap::from([(
        CATEGORY.to_string(),
        listing_page(&product_hrefs("milk", 0..4), None),
    )]));

    let links = discover(&driver, CATEGORY, &config, &CancellationToken::new()).await;

    assert!(links.is_empty());
    assert_eq!(driver.navigated(), vec![CATEGORY.to_string()]);
}

#[tokio::test]
async fn test_no_widget_single_page_policy() {
    let dir = TempDir::new().unwrap();
    let config = ScrapeConfig::builder()
        .site_origin(common::ORIGIN)
        .link_store(dir.path().join("links.csv"))
        .pagination_absence(PaginationAbsence::SinglePage)
        .endpoint(BrowserEndpoint::new("ws", "localhost", 9222))
        .build()
        .unwrap();
    let listing = listing_page(&product_hrefs("milk", 0..4), None);
    let driver = MockDriver::new(HashMap::from([
        (CATEGORY.to_string(), listing.clone()),
        (page(1), listing),
    ]));

    let links = discover(&driver, CATEGORY, &config, &CancellationToken::new()).await;

    // The first module listing items is the promo carousel
    assert_eq!(links, vec!["https://groceries.asda.com/product/promo/1".to_string()]);
}

#[tokio::test]
async fn test_failed_page_is_skipped() {
    let dir = TempDir::new().unwrap();
    let config = common::test_config(dir.path(), 1);
    let driver = MockDriver::new(HashMap::from([
        (
            CATEGORY.to_string(),
            listing_page(&product_hrefs("milk", 0..2), Some(Some("3"))),
        ),
        (page(1), listing_page(&product_hrefs("milk", 0..2), Some(Some("3")))),
        (page(3), listing_page(&product_hrefs("milk", 4..6), Some(Some("3")))),
    ]));

    let links = discover(&driver, CATEGORY, &config, &CancellationToken::new()).await;

    let mut expected = product_urls("milk", 0..2);
    expected.extend(product_urls("milk", 4..6));
    assert_eq!(links, expected);
}

#[tokio::test]
async fn test_failed_first_page_abandons_category() {
    let dir = TempDir::new().unwrap();
    let config = common::test_config(dir.path(), 1);
    let driver = MockDriver::new(HashMap::new());

    let links = discover(&driver, CATEGORY, &config, &CancellationToken::new()).await;

    assert!(links.is_empty());
    assert_eq!(driver.navigated(), vec![CATEGORY.to_string()]);
}

#[tokio::test]
async fn test_cancelled_walk_fetches_nothing() {
    let dir = TempDir::new().unwrap();
    let config = common::test_config(dir.path(), 1);
    let listing = listing_page(&product_hrefs("milk", 0..2), Some(Some("5")));
    let driver = MockDriver::new(HashMap::from([(CATEGORY.to_string(), listing)]));
    let cancel = CancellationToken::new();
    cancel.cancel();

    let links = discover(&driver, CATEGORY, &config, &cancel).await;

    assert!(links.is_empty());
    assert!(driver.navigated().is_empty());
}

#[tokio::test]
async fn test_cancel_mid_walk_keeps_earlier_pages() {
    let dir = TempDir::new().unwrap();
    let config = common::test_config(dir.path(), 1);
    let mut pages = HashMap::from([(
        CATEGORY.to_string(),
        listing_page(&product_hrefs("milk", 0..2), Some(Some("50"))),
    )]);
    for n in 1..=50 {
        pages.insert(page(n), listing_page(&product_hrefs("milk", 0..2), Some(Some("50"))));
    }
    let driver = MockDriver::new(pages).with_delay(std::time::Duration::from_millis(20));
    let stats = driver.stats();
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(std::time::Duration::from_millis(150)).await;
        trigger.cancel();
    });

    let links = discover(&driver, CATEGORY, &config, &cancel).await;

    assert!(!links.is_empty());
    assert!(links.len() < 100);
    let opened = stats.opened.load(std::sync::atomic::Ordering::SeqCst);
    let closed = stats.closed.load(std::sync::atomic::Ordering::SeqCst);
    assert_eq!(opened, closed);
}

#[tokio::test]
async fn test_every_fetch_closes_its_page() {
    let dir = TempDir::new().unwrap();
    let config = common::test_config(dir.path(), 1);
    let driver = MockDriver::new(HashMap::from([(
        CATEGORY.to_string(),
        listing_page(&product_hrefs("milk", 0..2), Some(Some("2"))),
    )]));
    let stats = driver.stats();

    discover(&driver, CATEGORY, &config, &CancellationToken::new()).await;

    // First page plus two numbered pages that fail navigation
    let opened = stats.opened.load(std::sync::atomic::Ordering::SeqCst);
    let closed = stats.closed.load(std::sync::atomic::Ordering::SeqCst);
    assert_eq!(opened, 3);
    assert_eq!(closed, 3);
}

#[tokio::test]
async fn test_site_map_prefers_view_all() {
    let dir = TempDir::new().unwrap();
    let config = common::test_config(dir.path(), 1);
    let sitemap = common::sitemap_page(&[
        &["/aisle/fresh/milk", "/dept/fresh/view-all"],
        &["/aisle/bakery/bread", "/aisle/bakery/cakes"],
    ]);
    let driver = MockDriver::new(HashMap::from([(common::SITEMAP.to_string(), sitemap)]));

    let categories = fetch_category_links(&driver, &config, &CancellationToken::new()).await.unwrap();

    assert_eq!(
        categories,
        vec![
            "https://groceries.asda.com/dept/fresh/view-all",
            "https://groceries.asda.com/aisle/bakery/bread",
            "https://groceries.asda.com/aisle/bakery/cakes",
        ]
    );
}

#[tokio::test]
async fn test_site_map_failure_is_an_error() {
    let dir = TempDir::new().unwrap();
    let config = common::test_config(dir.path(), 1);
    let driver = MockDriver::new(HashMap::new());

    assert!(fetch_category_links(&driver, &config, &CancellationToken::new()).await.is_err());
}
