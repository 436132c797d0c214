use std::sync::Arc;
use async_trait::async_trait;
use tokio::sync::oneshot;

use crate::communication::{Item, Pill, QueueItem, WorkQueue};
use crate::core::batch::dispatch_loop;
use crate::core::worker::DispatchWorkerHandle;
use crate::error::SubmitError;
use super::core_trait::{GenerationBatcher, Generator};
use super::handler::GenerationHandler;
use super::request::{GenerationRequest, JobOutcome};

/// # GenerationBatchInference
///
/// The dispatch engine: one background worker task exclusively owning the
/// model, fed through a FIFO work queue, collecting batches of up to `S`
/// jobs and executing them strictly sequentially.
///
/// The model is moved into the worker task at construction and is never
/// reachable from a submitting task, which makes the serialization invariant
/// hold by construction. Dropping the engine shuts the worker down; jobs
/// still queued at that point observe a worker-side failure.
pub struct GenerationBatchInference<const S: usize> {
    /// Mailbox of jobs awaiting the dispatcher.
    queue: Arc<WorkQueue<QueueItem<GenerationRequest, JobOutcome>>>,

    /// Lifecycle handle for the background dispatch task.
    handle: DispatchWorkerHandle,
}

impl<const S: usize> GenerationBatchInference<S> {
    /// Spawns the worker task, moving `model` into it.
    ///
    /// # Parameters
    ///
    /// * `model` - The processing variants; exclusively owned by the worker
    ///   from here on.
    /// * `denylist` - The static set of vocabulary ids the long variant must
    ///   never emit, handed to the model on every long invocation.
    pub fn new<G>(model: G, denylist: Vec<u32>) -> Self
    where
        G: Generator + Send + Sync + 'static,
    {
        let queue = Arc::new(WorkQueue::new());
        let pill = Pill::new();

        let handle = DispatchWorkerHandle::new(queue.notifier(), {
            let queue = queue.clone();
            move |running| {
                tokio::spawn(async move {
                    let _pill = pill;
                    let handler = GenerationHandler { model, denylist };

                    dispatch_loop::<GenerationHandler<G>, S>(&handler, running, queue).await;
                })
            }
        });

        Self { queue, handle }
    }

    /// Number of jobs currently waiting in the queue. Approximate by design;
    /// the same snapshot admission control reads.
    pub async fn queued_count(&self) -> usize {
        self.queue.len().await
    }

    /// Requests worker shutdown without waiting for it to finish.
    pub fn shutdown(&mut self) {
        self.handle.shutdown();
    }
}

#[async_trait]
impl<const S: usize> GenerationBatcher<GenerationRequest, JobOutcome>
    for GenerationBatchInference<S>
{
    /// Applies the admission check against the current queue depth, then
    /// enqueues the job and returns its result future.
    ///
    /// The depth snapshot races with concurrent submissions; that is the
    /// documented soft bound, chosen to shed load rather than meter it
    /// exactly.
    async fn submit(
        &self,
        request: GenerationRequest,
    ) -> Result<Item<JobOutcome>, SubmitError> {
        let queued = self.queue.len().await;
        if queued > S {
            return Err(SubmitError::TooManyRequests { queued });
        }

        let (tx, rx) = oneshot::channel();
        self.queue.push(QueueItem::new(request, tx)).await;
        Ok(Item::new(rx))
    }
}
