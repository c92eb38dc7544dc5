//! Link store dedup and record store append semantics

use aisle_scraper::page_extractor::ProductRecord;
use aisle_scraper::sink::{CsvSink, LinkRow, finish, load_distinct};
use proptest::prelude::*;
use std::collections::HashSet;
use std::path::Path;
use tempfile::TempDir;

fn write_links(path: &Path, links: &[String]) {
    let mut writer = csv::Writer::from_path(path).unwrap();
    for link in links {
        writer.serialize(LinkRow::new(link.as_str())).unwrap();
    }
    writer.flush().unwrap();
}

proptest! {
    #[test]
    fn load_distinct_counts_distinct_urls(ids in prop::collection::vec(0u16..50, 0..300)) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("links.csv");
        let links: Vec<String> = ids
            .iter()
            .map(|id| format!("https://groceries.asda.com/product/{id}"))
            .collect();
        write_links(&path, &links);

        let loaded = load_distinct(&path).unwrap();
        let expected: HashSet<&String> = links.iter().collect();

        prop_assert_eq!(loaded.len(), expected.len());
        prop_assert_eq!(loaded.iter().collect::<HashSet<_>>().len(), loaded.len());
        for link in &loaded {
            prop_assert!(expected.contains(link));
        }
    }
}

fn record(url: &str) -> ProductRecord {
    ProductRecord {
        source: "ASDA".to_string(),
        title: Some("Bread".to_string()),
        description: String::new(),
        item_price: Some("£0.75".to_string()),
        offer_price: None,
        unit_price: None,
        average_rating: 0.0,
        review_count: 0,
        tags: String::new(),
        categories: String::new(),
        product_url: url.to_string(),
        image_url: None,
        last_updated: "14/10/2026 09:30:00".to_string(),
    }
}

async fn write_records(path: &Path, urls: &[&str]) {
    let (handle, task) = CsvSink::spawn::<ProductRecord>(path, 8).unwrap();
    for url in urls {
        handle.append(record(url)).await.unwrap();
    }
    drop(handle);
    finish(task, path).await.unwrap();
}

#[tokio::test]
async fn test_two_runs_append_union_of_rows() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("products.csv");

    write_records(&path, &["https://x/1", "https://x/2"]).await;
    write_records(&path, &["https://x/2", "https://x/3"]).await;

    let mut reader = csv::Reader::from_path(&path).unwrap();
    let rows: Vec<ProductRecord> = reader.deserialize().map(Result::unwrap).collect();
    let urls: Vec<&str> = rows.iter().map(|r| r.product_url.as_str()).collect();
    assert_eq!(urls, vec!["https://x/1", "https://x/2", "https://x/2", "https://x/3"]);

    let contents = std::fs::read_to_string(&path).unwrap();
    assert_eq!(contents.matches("source,title").count(), 1);
}

#[tokio::test]
async fn test_concurrent_handles_share_one_header() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("links.csv");
    let (handle, task) = CsvSink::spawn::<LinkRow>(&path, 2).unwrap();

    let mut writers = Vec::new();
    for w in 0..8 {
        let handle = handle.clone();
        writers.push(tokio::spawn(async move {
            for n in 0..25 {
                handle
                    .append(LinkRow::new(format!("https://x/{w}/{n}")))
                    .await
                    .unwrap();
            }
        }));
    }
    for writer in writers {
        writer.await.unwrap();
    }
    drop(handle);
    let stats = finish(task, &path).await.unwrap();

    assert_eq!(stats.rows_written, 200);
    let contents = std::fs::read_to_string(&path).unwrap();
    assert_eq!(contents.lines().filter(|l| *l == "Link").count(), 1);
    assert_eq!(load_distinct(&path).unwrap().len(), 200);
}
