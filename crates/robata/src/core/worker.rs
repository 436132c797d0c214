//! Lifecycle management for the background dispatch task.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Notify;
use tokio::task::JoinHandle;

/// A handle owning the single background dispatch task.
///
/// The handle holds the shared running flag the task polls between batches
/// and a clone of the signal the task sleeps on, so shutdown can both request
/// the stop and wake the sleeper to observe it. Dropping the handle shuts the
/// task down.
pub(crate) struct DispatchWorkerHandle {
    /// Flag the task polls to decide whether to keep looping.
    running: Arc<AtomicBool>,

    /// Handle to the spawned task; `None` once shutdown has been initiated.
    handle: Option<JoinHandle<()>>,

    /// The signal the task sleeps on between polls.
    waker: Arc<Notify>,
}

impl DispatchWorkerHandle {
    /// Spawns the dispatch task.
    ///
    /// # Parameters
    ///
    /// * `waker` - The signal the task sleeps on, used here only to hasten
    ///   shutdown.
    /// * `task` - Receives the shared running flag and spawns the actual
    ///   loop, returning its `JoinHandle`.
    pub fn new<F>(waker: Arc<Notify>, task: F) -> Self
    where
        F: FnOnce(Arc<AtomicBool>) -> JoinHandle<()>,
    {
        let running = Arc::new(AtomicBool::new(true));
        let handle = task(running.clone());

        Self {
            running,
            handle: Some(handle),
            waker,
        }
    }

    #[allow(dead_code)]
    pub fn running(&self) -> Arc<AtomicBool> {
        self.running.clone()
    }

    /// Initiates a graceful shutdown: clear the running flag, wake the task
    /// so it can observe the flag, and detach a waiter on its completion.
    /// Safe to call more than once.
    pub fn shutdown(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        self.waker.notify_one();

        if let Some(handle) = self.handle.take() {
            tokio::spawn(async move {
                let _ = handle.await;
            });
        }
    }
}

impl Drop for DispatchWorkerHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::time;

    fn spawn_looping_worker(
        waker: Arc<Notify>,
        stopped: Arc<AtomicBool>,
    ) -> DispatchWorkerHandle {
        DispatchWorkerHandle::new(waker, move |running| {
            tokio::spawn(async move {
                while running.load(Ordering::SeqCst) {
                    time::sleep(Duration::from_millis(10)).await;
                }
                stopped.store(true, Ordering::SeqCst);
            })
        })
    }

    #[tokio::test]
    async fn starts_running() {
        let worker = spawn_looping_worker(
            Arc::new(Notify::new()),
            Arc::new(AtomicBool::new(false)),
        );

        assert!(worker.running().load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn shutdown_stops_the_task() {
        let stopped = Arc::new(AtomicBool::new(false));
        let mut worker = spawn_looping_worker(Arc::new(Notify::new()), stopped.clone());

        worker.shutdown();
        time::sleep(Duration::from_millis(100)).await;

        assert!(!worker.running().load(Ordering::SeqCst));
        assert!(stopped.load(Ordering::SeqCst));
        assert!(worker.handle.is_none());
    }

    #[tokio::test]
    async fn drop_triggers_shutdown() {
        let stopped = Arc::new(AtomicBool::new(false));

        {
            let _worker = spawn_looping_worker(Arc::new(Notify::new()), stopped.clone());
        }

        time::sleep(Duration::from_millis(100)).await;
        assert!(stopped.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn repeated_shutdown_is_harmless() {
        let mut worker = spawn_looping_worker(
            Arc::new(Notify::new()),
            Arc::new(AtomicBool::new(false)),
        );

        worker.shutdown();
        worker.shutdown();
        worker.shutdown();

        assert!(!worker.running().load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn shutdown_wakes_a_sleeping_task() {
        let waker = Arc::new(Notify::new());
        let stopped = Arc::new(AtomicBool::new(false));

        let mut worker = DispatchWorkerHandle::new(waker.clone(), {
            let stopped = stopped.clone();
            let waker = waker.clone();
            move |running| {
                tokio::spawn(async move {
                    while running.load(Ordering::SeqCst) {
                        waker.notified().await;
                    }
                    stopped.store(true, Ordering::SeqCst);
                })
            }
        });

        time::sleep(Duration::from_millis(50)).await;
        worker.shutdown();
        time::sleep(Duration::from_millis(100)).await;

        assert!(stopped.load(Ordering::SeqCst));
    }
}
