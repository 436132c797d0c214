use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, Notify};

/// # WorkQueue
///
/// The FIFO mailbox between submitting tasks and the dispatch loop.
///
/// Many producers push; exactly one consumer (the dispatch loop) drains.
/// The queue itself is unbounded; backlog is bounded by admission control
/// at submission time, not here. A `Notify` rides along so the consumer can
/// sleep between polls without missing a push.
///
/// ## Invariant
///
/// A job is removed at most once, by the dispatcher, and always before its
/// result slot is written.
pub(crate) struct WorkQueue<T> {
    items: Mutex<Vec<T>>,
    work_notifier: Arc<Notify>,
}

impl<T> WorkQueue<T> {
    pub fn new() -> Self {
        Self {
            items: Mutex::new(vec![]),
            work_notifier: Arc::new(Notify::new()),
        }
    }

    /// Appends a job at the tail and signals the dispatch loop. Never blocks
    /// beyond the queue lock and never fails.
    pub async fn push(&self, item: T) {
        self.items.lock().await.push(item);
        self.work_notifier.notify_one();
    }

    /// Snapshot of the current queue depth.
    ///
    /// Used for admission decisions and monitoring only; a race with a
    /// concurrent push is acceptable, making this a soft bound rather than
    /// an exact quota.
    pub async fn len(&self) -> usize {
        self.items.lock().await.len()
    }

    /// Removes and returns up to `max` jobs from the head, oldest first.
    pub async fn drain_up_to(&self, max: usize) -> Vec<T> {
        let mut items = self.items.lock().await;
        let take = usize::min(max, items.len());
        items.drain(..take).collect()
    }

    /// Waits for the work signal with a bounded timeout.
    ///
    /// Returns `false` when the timeout elapses first, an expected
    /// empty-queue condition the caller simply retries on. A signal from a
    /// push that happened before this call is not lost; it completes the
    /// wait immediately.
    pub async fn await_work(&self, poll: Duration) -> bool {
        tokio::time::timeout(poll, self.work_notifier.notified())
            .await
            .is_ok()
    }

    /// Clone of the underlying notifier, used to hasten shutdown by waking a
    /// sleeping consumer.
    pub fn notifier(&self) -> Arc<Notify> {
        self.work_notifier.clone()
    }
}
