//! Stage coordinators
//!
//! Each stage probes the browser endpoint, partitions its inputs, runs one
//! worker per partition and funnels rows into a single sink writer. The
//! progress reporter always receives a final completion or failure event.

use log::{debug, info, warn};
use std::sync::Arc;
use std::time::Instant;
use tokio_util::sync::CancellationToken;

use super::crawl_types::{ScrapeError, ScrapeResult, Stage, StageReport};
use super::partition::partition;
use super::progress::ProgressReporter;
use super::worker_pool::{PoolSummary, run_partitions};
use crate::browser_session::{PageDriver, ReadinessMarker, SessionTimeouts, fetch_document};
use crate::config::ScrapeConfig;
use crate::page_extractor::{ProductRecord, extract_product};
use crate::pagination::{discover, fetch_category_links};
use crate::sink::{CsvSink, LinkRow, SinkHandle, SinkTask, finish, load_distinct};
use crate::utils::constants::product;

/// Readiness marker of product detail pages
pub const PRODUCT_READY: ReadinessMarker = ReadinessMarker::css(product::READY);

/// Stage 1: site map → category listings → link store
pub async fn run_category_stage<D, P>(
    driver: Arc<D>,
    config: &ScrapeConfig,
    cancel: &CancellationToken,
    progress: &P,
) -> ScrapeResult<StageReport>
where
    D: PageDriver + 'static,
    P: ProgressReporter,
{
    let started = Instant::now();
    let outcome = category_stage(driver, config, cancel, progress, started).await;
    conclude(Stage::Discovery, outcome, progress)
}

/// Stage 2: distinct links → product pages → record store
pub async fn run_product_stage<D, P>(
    driver: Arc<D>,
    config: &ScrapeConfig,
    cancel: &CancellationToken,
    progress: &P,
) -> ScrapeResult<StageReport>
where
    D: PageDriver + 'static,
    P: ProgressReporter,
{
    let started = Instant::now();
    let outcome = product_stage(driver, config, cancel, progress, started).await;
    conclude(Stage::Extraction, outcome, progress)
}

fn conclude<P: ProgressReporter>(
    stage: Stage,
    outcome: ScrapeResult<StageReport>,
    progress: &P,
) -> ScrapeResult<StageReport> {
    match outcome {
        Ok(report) => {
            progress.report_stage_completed(&report);
            if report.cancelled() {
                Err(ScrapeError::Cancelled)
            } else {
                Ok(report)
            }
        }
        Err(e) => {
            progress.report_stage_failed(stage, &e.to_string());
            Err(e)
        }
    }
}

async fn category_stage<D, P>(
    driver: Arc<D>,
    config: &ScrapeConfig,
    cancel: &CancellationToken,
    progress: &P,
    started: Instant,
) -> ScrapeResult<StageReport>
where
    D: PageDriver + 'static,
    P: ProgressReporter,
{
    driver.probe().await?;
    debug!("Browser endpoint {} answered probe", config.endpoint());

    let categories = fetch_category_links(driver.as_ref(), config, cancel)
        .await
        .map_err(|e| {
            if e.is_cancelled() {
                ScrapeError::Cancelled
            } else {
                ScrapeError::SiteMap(e)
            }
        })?;

    let inputs = categories.len();
    let workers = config.category_workers();
    progress.report_stage_started(Stage::Discovery, inputs, workers);

    let (sink, task) = CsvSink::spawn::<LinkRow>(config.link_store(), config.sink_capacity())?;
    let shared = Arc::new(config.clone());

    let pool = run_partitions(
        Stage::Discovery,
        partition(categories, workers),
        cancel,
        config.shutdown_grace(),
        progress,
        |worker, block, token| {
            category_worker(worker, block, driver.clone(), shared.clone(), sink.clone(), token)
        },
    )
    .await;

    close_stage(Stage::Discovery, sink, task, inputs, pool, started).await
}

async fn product_stage<D, P>(
    driver: Arc<D>,
    config: &ScrapeConfig,
    cancel: &CancellationToken,
    progress: &P,
    started: Instant,
) -> ScrapeResult<StageReport>
where
    D: PageDriver + 'static,
    P: ProgressReporter,
{
    driver.probe().await?;
    debug!("Browser endpoint {} answered probe", config.endpoint());

    let links = load_distinct(config.link_store())?;
    let inputs = links.len();
    let workers = config.product_workers();
    progress.report_stage_started(Stage::Extraction, inputs, workers);

    let (sink, task) =
        CsvSink::spawn::<ProductRecord>(config.record_store(), config.sink_capacity())?;
    let shared = Arc::new(config.clone());

    let pool = run_partitions(
        Stage::Extraction,
        partition(links, workers),
        cancel,
        config.shutdown_grace(),
        progress,
        |worker, block, token| {
            product_worker(worker, block, driver.clone(), shared.clone(), sink.clone(), token)
        },
    )
    .await;

    close_stage(Stage::Extraction, sink, task, inputs, pool, started).await
}

async fn close_stage<T: Send + 'static>(
    stage: Stage,
    sink: SinkHandle<T>,
    task: SinkTask,
    inputs: usize,
    pool: PoolSummary,
    started: Instant,
) -> ScrapeResult<StageReport> {
    let path = sink.path().to_path_buf();
    // The writer drains once the last handle is gone; aborted workers have
    // already dropped theirs.
    drop(sink);
    let stats = finish(task, &path).await?;
    debug!(
        "{stage} sink {} closed with {} row(s)",
        stats.path.display(),
        stats.rows_written
    );

    Ok(StageReport {
        stage,
        inputs,
        rows_written: stats.rows_written,
        pool,
        elapsed: started.elapsed(),
    })
}

async fn category_worker<D: PageDriver>(
    worker: usize,
    categories: Vec<String>,
    driver: Arc<D>,
    config: Arc<ScrapeConfig>,
    sink: SinkHandle<LinkRow>,
    cancel: CancellationToken,
) -> usize {
    let mut produced = 0;

    for category in categories {
        if cancel.is_cancelled() {
            info!("Discovery worker {worker} stopping on cancellation");
            break;
        }

        let links = discover(driver.as_ref(), &category, &config, &cancel).await;
        info!("{category}: {} product link(s)", links.len());

        for link in links {
            if let Err(e) = sink.append(LinkRow::new(link)).await {
                warn!("Discovery worker {worker} lost its sink: {e}");
                return produced;
            }
            produced += 1;
        }
    }

    produced
}

async fn product_worker<D: PageDriver>(
    worker: usize,
    links: Vec<String>,
    driver: Arc<D>,
    config: Arc<ScrapeConfig>,
    sink: SinkHandle<ProductRecord>,
    cancel: CancellationToken,
) -> usize {
    let timeouts = SessionTimeouts::from_config(&config);
    let mut produced = 0;

    for link in links {
        if cancel.is_cancelled() {
            info!("Extraction worker {worker} stopping on cancellation");
            break;
        }

        let html = match fetch_document(driver.as_ref(), &link, PRODUCT_READY, timeouts, &cancel)
            .await
        {
            Ok(html) => html,
            Err(e) if e.is_cancelled() => {
                info!("Extraction worker {worker} cancelled during {link}");
                break;
            }
            Err(e) => {
                warn!("Skipping product {link}: {e}");
                continue;
            }
        };

        let Some(record) = extract_product(&html, &link, config.site_label()) else {
            warn!("No product details on {link}");
            continue;
        };

        info!(
            "{}: {} | {}",
            link,
            record.title.as_deref().unwrap_or("<untitled>"),
            record.item_price.as_deref().unwrap_or("-")
        );

        if let Err(e) = sink.append(record).await {
            warn!("Extraction worker {worker} lost its sink: {e}");
            return produced;
        }
        produced += 1;
    }

    produced
}
