use async_trait::async_trait;

/// Processing half of the dispatch loop.
///
/// An implementation executes every job of a collected batch, in order, and
/// delivers each job's outcome on its result channel. It runs on the single
/// worker task, so execution is strictly sequential within a batch and across
/// batches; that is the serialization invariant of the whole engine.
///
/// A failing job must be recovered locally (deliver a failure marker and move
/// on); only a panic is allowed to escape, and the loop confines that to the
/// batch in flight.
#[async_trait]
pub(crate) trait BatchHandler: Send + Sync {
    type Job: Send;

    async fn process_batch(&self, batch: Vec<Self::Job>);
}
