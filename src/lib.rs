pub mod browser_session;
pub mod config;
pub mod crawl_engine;
pub mod page_extractor;
pub mod pagination;
pub mod sink;
pub mod utils;

pub use browser_session::{
    ChromiumDriver, PageDriver, ReadinessMarker, RemotePage, SessionError, SessionTimeouts,
    fetch_document,
};
pub use config::{BrowserEndpoint, Credentials, PaginationAbsence, ScrapeConfig};
pub use crawl_engine::{
    LogProgress, NoOpProgress, ProgressReporter, ScrapeError, ScrapeResult, Stage, StageReport,
    partition, run_category_stage, run_product_stage,
};
pub use page_extractor::schema::*;
pub use page_extractor::{extract_product, extract_product_at};
pub use pagination::{category_links, discover, listing_links};
pub use sink::{CsvSink, LinkRow, SinkError, load_distinct};
