use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use futures::FutureExt;
use tracing::error;

use super::handler::BatchHandler;
use crate::communication::WorkQueue;
use crate::config::CHECK_INTERVAL;

/// Runs the dispatch loop until the running flag clears: collect a batch of
/// up to `S` jobs, process it, repeat.
///
/// A panic escaping batch processing fails only the batch in flight: the
/// jobs' result channels are dropped during the unwind, so their submitters
/// observe a worker-side failure. The loop logs the event and resumes;
/// queued and future jobs are unaffected.
pub(crate) async fn dispatch_loop<H, const S: usize>(
    handler: &H,
    running: Arc<AtomicBool>,
    queue: Arc<WorkQueue<H::Job>>,
) where
    H: BatchHandler,
{
    loop {
        if !running.load(Ordering::SeqCst) {
            break;
        }

        let batch = collect_batch(&queue, S, &running).await;
        if batch.is_empty() {
            continue;
        }

        let processed = AssertUnwindSafe(handler.process_batch(batch))
            .catch_unwind()
            .await;
        if processed.is_err() {
            error!("batch processing panicked; failing the in-flight batch and resuming");
        }
    }
}

/// Drains the queue into a batch, waiting on the work signal between
/// attempts until `capacity` jobs are gathered. Waking up empty-handed is the
/// expected idle case, not an error.
///
/// Collection ends early when shutdown is requested, so a partial batch is
/// still delivered rather than dropped.
async fn collect_batch<T>(queue: &WorkQueue<T>, capacity: usize, running: &AtomicBool) -> Vec<T> {
    let mut batch = Vec::with_capacity(capacity);

    while batch.len() < capacity {
        if !running.load(Ordering::SeqCst) {
            break;
        }

        batch.extend(queue.drain_up_to(capacity - batch.len()).await);
        if batch.len() < capacity {
            queue.await_work(CHECK_INTERVAL).await;
        }
    }

    batch
}
