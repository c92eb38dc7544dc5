//! Progress reporting abstraction for scrape stages
//!
//! Defines the `ProgressReporter` trait for stage lifecycle events, a
//! logging implementation and a no-op implementation for tests.

use log::{error, info, warn};

use super::crawl_types::{Stage, StageReport};

/// Trait for reporting stage progress at key lifecycle events
///
/// The coordinator calls [`report_stage_completed`](Self::report_stage_completed)
/// or [`report_stage_failed`](Self::report_stage_failed) exactly once per
/// stage run, whatever the outcome.
pub trait ProgressReporter: Send + Sync {
    /// Report that a stage is about to partition `inputs` across `workers`
    fn report_stage_started(&self, stage: Stage, inputs: usize, workers: usize);

    /// Report that one worker ran its block to the end
    fn report_worker_finished(&self, stage: Stage, worker: usize, produced: usize);

    /// Report that a worker task panicked
    fn report_worker_failed(&self, stage: Stage, error: &str);

    /// Report the end of a stage that ran to completion or was cancelled
    fn report_stage_completed(&self, report: &StageReport);

    /// Report a stage that ended on a fatal error
    fn report_stage_failed(&self, stage: Stage, error: &str);
}

/// Progress reporter that writes every event to the log
#[derive(Debug, Clone, Copy, Default)]
pub struct LogProgress;

impl ProgressReporter for LogProgress {
    fn report_stage_started(&self, stage: Stage, inputs: usize, workers: usize) {
        info!("Starting {stage} stage: {inputs} item(s) across {workers} worker(s)");
    }

    fn report_worker_finished(&self, stage: Stage, worker: usize, produced: usize) {
        info!("{stage} worker {worker} finished, {produced} row(s) produced");
    }

    fn report_worker_failed(&self, stage: Stage, error: &str) {
        error!("{stage} worker failed: {error}");
    }

    fn report_stage_completed(&self, report: &StageReport) {
        if report.cancelled() {
            warn!(
                "{} stage interrupted after {:.1?}: {} row(s) written, {} worker(s) aborted",
                report.stage, report.elapsed, report.rows_written, report.pool.aborted
            );
        } else {
            info!(
                "{} stage completed in {:.1?}: {} input(s), {} row(s) written, {}/{} worker(s) ok",
                report.stage,
                report.elapsed,
                report.inputs,
                report.rows_written,
                report.pool.completed,
                report.pool.workers
            );
        }
    }

    fn report_stage_failed(&self, stage: Stage, error: &str) {
        error!("{stage} stage finished with a fatal error: {error}");
    }
}

/// Progress reporter that does nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpProgress;

impl ProgressReporter for NoOpProgress {
    fn report_stage_started(&self, _stage: Stage, _inputs: usize, _workers: usize) {}
    fn report_worker_finished(&self, _stage: Stage, _worker: usize, _produced: usize) {}
    fn report_worker_failed(&self, _stage: Stage, _error: &str) {}
    fn report_stage_completed(&self, _report: &StageReport) {}
    fn report_stage_failed(&self, _stage: Stage, _error: &str) {}
}
