//! Crawl Engine Module
//!
//! Partitioning, the worker pool and the two stage coordinators that drive
//! discovery and extraction.

// Sub-modules
pub mod crawl_types;
pub mod orchestrator;
pub mod partition;
pub mod progress;
pub mod worker_pool;

// Re-exports for public API
pub use crawl_types::{ScrapeError, ScrapeResult, Stage, StageReport};
pub use orchestrator::{PRODUCT_READY, run_category_stage, run_product_stage};
pub use partition::partition;
pub use progress::{LogProgress, NoOpProgress, ProgressReporter};
pub use worker_pool::{PoolSummary, run_partitions};
