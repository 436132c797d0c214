use async_trait::async_trait;

use crate::communication::Item;
use crate::error::{GenerateError, SubmitError};
use super::request::SampleMap;

/// # Generator
///
/// The two opaque processing variants the engine runs. Implemented by the
/// model supplied at engine construction; the engine never looks inside a
/// variant, it only routes to one and records whether it succeeded.
///
/// ## Execution Context
///
/// Both methods execute on the single worker task and are never invoked
/// concurrently; implementations may assume exclusive access to the
/// underlying compute resource for the duration of a call.
///
/// ## Failure
///
/// Return `Err` for any condition that should fail the job. The dispatcher
/// logs the cause and delivers the failure marker; it never lets one job's
/// error abort the batch.
#[async_trait]
pub trait Generator {
    /// The "short" variant: for each of `num_samples` samples, produce a
    /// single next-token continuation of `prompt`, keyed by 0-based sample
    /// index.
    async fn complete_short(
        &self,
        prompt: &str,
        num_samples: usize,
    ) -> Result<SampleMap, GenerateError>;

    /// The "long" variant: for each sample, produce a continuation of up to
    /// `length` tokens beyond the prompt.
    ///
    /// `length` counts *additional* generated tokens; implementations derive
    /// their internal target from the prompt's own token count plus
    /// `length`. No token whose vocabulary id appears in `denylist` may be
    /// emitted.
    async fn complete_long(
        &self,
        prompt: &str,
        num_samples: usize,
        length: usize,
        denylist: &[u32],
    ) -> Result<SampleMap, GenerateError>;
}

/// # GenerationBatcher
///
/// The submission surface of the dispatch engine.
#[async_trait]
pub trait GenerationBatcher<R, O> {
    /// Queues a request for the worker, or rejects it outright when the
    /// queue is already saturated.
    ///
    /// # Returns
    ///
    /// An [`Item`] future that resolves once the dispatcher writes the job's
    /// outcome. Dropping the item abandons the job: the dispatcher skips it
    /// without ever invoking the worker.
    async fn submit(&self, request: R) -> Result<Item<O>, SubmitError>;
}
