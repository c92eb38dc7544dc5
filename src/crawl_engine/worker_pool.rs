//! One task per partition, joined as a unit
//!
//! Workers share nothing but what their future captures (typically a sink
//! handle and an `Arc` of the driver). Cancellation is cooperative: every
//! worker receives a child of the run's token and is expected to stop
//! between page fetches. Workers still running `grace` after cancellation
//! are aborted.

use log::{debug, warn};
use std::future::Future;
use std::time::Duration;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use super::crawl_types::Stage;
use super::progress::ProgressReporter;

/// How the workers of one pool ended
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolSummary {
    /// Workers spawned, one per partition
    pub workers: usize,
    /// Workers that returned normally
    pub completed: usize,
    /// Workers that panicked
    pub failed: usize,
    /// Workers aborted after the shutdown grace period
    pub aborted: usize,
    /// Sum of the counts returned by completed workers
    pub produced: usize,
    /// Whether cancellation was observed while joining
    pub cancelled: bool,
}

/// Run `work_fn` once per partition and wait for every worker
///
/// `work_fn` receives the worker index, its block and a cancellation token,
/// and returns the number of rows the worker produced.
pub async fn run_partitions<T, F, Fut>(
    stage: Stage,
    partitions: Vec<Vec<T>>,
    cancel: &CancellationToken,
    grace: Duration,
    progress: &dyn ProgressReporter,
    work_fn: F,
) -> PoolSummary
where
    T: Send + 'static,
    F: Fn(usize, Vec<T>, CancellationToken) -> Fut,
    Fut: Future<Output = usize> + Send + 'static,
{
    let mut set = JoinSet::new();
    let mut summary = PoolSummary::default();

    for (worker, block) in partitions.into_iter().enumerate() {
        debug!("Spawning {stage} worker {worker} with {} item(s)", block.len());
        let fut = work_fn(worker, block, cancel.child_token());
        set.spawn(async move { (worker, fut.await) });
        summary.workers += 1;
    }

    tokio::select! {
        () = drain(stage, &mut set, &mut summary, progress) => return summary,
        () = cancel.cancelled() => {}
    }

    summary.cancelled = true;
    warn!(
        "{stage} cancelled, waiting up to {grace:?} for {} worker(s)",
        set.len()
    );

    let graceful =
        tokio::time::timeout(grace, drain(stage, &mut set, &mut summary, progress)).await;
    if graceful.is_err() {
        warn!("Aborting {} {stage} worker(s) after grace period", set.len());
        set.abort_all();
        drain(stage, &mut set, &mut summary, progress).await;
    }

    summary
}

async fn drain(
    stage: Stage,
    set: &mut JoinSet<(usize, usize)>,
    summary: &mut PoolSummary,
    progress: &dyn ProgressReporter,
) {
    while let Some(joined) = set.join_next().await {
        match joined {
            Ok((worker, produced)) => {
                summary.completed += 1;
                summary.produced += produced;
                progress.report_worker_finished(stage, worker, produced);
            }
            Err(e) if e.is_cancelled() => summary.aborted += 1,
            Err(e) => {
                summary.failed += 1;
                progress.report_worker_failed(stage, &e.to_string());
            }
        }
    }
}
