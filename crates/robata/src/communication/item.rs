use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;
use tokio::sync::oneshot;

use crate::error::WaitError;

/// # Item
///
/// The submitting side of a job's result rendezvous: a future over the
/// one-shot channel the dispatcher writes the outcome to.
///
/// Awaiting the item suspends the submitting task until the slot is written;
/// there is no timer loop on this path. The `Err` case of the plain `await`
/// means the worker dropped the job without delivering (its batch was lost to
/// a panic, or the engine shut down).
///
/// Dropping an `Item` abandons the job: the dispatcher observes the closed
/// channel and skips the job without invoking the worker.
pub struct Item<T> {
    /// The underlying channel receiver
    receiver: oneshot::Receiver<T>,
}

impl<T> Item<T> {
    pub(crate) fn new(receiver: oneshot::Receiver<T>) -> Self {
        Self { receiver }
    }

    /// Awaits the outcome with an explicit bound.
    ///
    /// # Returns
    ///
    /// The delivered outcome, [`WaitError::TimedOut`] when `limit` elapses
    /// first, or [`WaitError::WorkerGone`] when the worker dropped the job.
    pub async fn wait_timeout(self, limit: Duration) -> Result<T, WaitError> {
        match tokio::time::timeout(limit, self.receiver).await {
            Ok(Ok(outcome)) => Ok(outcome),
            Ok(Err(_)) => Err(WaitError::WorkerGone),
            Err(_) => Err(WaitError::TimedOut),
        }
    }
}

impl<T> Future for Item<T> {
    type Output = Result<T, oneshot::error::RecvError>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.get_mut().receiver).poll(cx)
    }
}
