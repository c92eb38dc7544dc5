//! Scoped page fetch: outcomes and page teardown

use aisle_scraper::browser_session::{ReadinessMarker, SessionTimeouts, fetch_document};
use std::collections::HashMap;
use std::sync::atomic::Ordering;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

mod common;
use common::{DriverStats, MockDriver};

const URL: &str = "https://groceries.asda.com/product/milk/0";
const MARKER: ReadinessMarker = ReadinessMarker::css("div.pdp-main-details");

fn timeouts() -> SessionTimeouts {
    SessionTimeouts {
        readiness: Duration::from_secs(3),
        page_load: Duration::from_secs(30),
    }
}

fn counts(stats: &DriverStats) -> (usize, usize) {
    (
        stats.opened.load(Ordering::SeqCst),
        stats.closed.load(Ordering::SeqCst),
    )
}

#[tokio::test]
async fn test_ready_page_returns_document() {
    let html = common::product_page("Milk");
    let driver = MockDriver::new(HashMap::from([(URL.to_string(), html.clone())]));
    let stats = driver.stats();

    let document = fetch_document(&driver, URL, MARKER, timeouts(), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(document, html);
    assert_eq!(counts(&stats), (1, 1));
}

#[tokio::test]
async fn test_missing_marker_times_out_and_closes() {
    let driver = MockDriver::new(HashMap::from([(
        URL.to_string(),
        "<html><body><p>Please wait</p></body></html>".to_string(),
    )]));
    let stats = driver.stats();

    let err = fetch_document(&driver, URL, MARKER, timeouts(), &CancellationToken::new())
        .await
        .unwrap_err();

    assert!(err.is_timeout(), "{err}");
    assert_eq!(counts(&stats), (1, 1));
}

#[tokio::test]
async fn test_cancel_interrupts_slow_navigation_and_closes() {
    let driver = MockDriver::new(HashMap::from([(
        URL.to_string(),
        common::product_page("Milk"),
    )]))
    .with_delay(Duration::from_secs(5));
    let stats = driver.stats();

    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        trigger.cancel();
    });

    let started = Instant::now();
    let err = fetch_document(&driver, URL, MARKER, timeouts(), &cancel)
        .await
        .unwrap_err();

    assert!(err.is_cancelled(), "{err}");
    assert!(started.elapsed() < Duration::from_secs(2));
    assert_eq!(counts(&stats), (1, 1));
}

#[tokio::test]
async fn test_cancelled_before_fetch_opens_nothing() {
    let driver = MockDriver::new(HashMap::new());
    let stats = driver.stats();
    let cancel = CancellationToken::new();
    cancel.cancel();

    let err = fetch_document(&driver, URL, MARKER, timeouts(), &cancel)
        .await
        .unwrap_err();

    assert!(err.is_cancelled());
    assert_eq!(counts(&stats), (0, 0));
}
