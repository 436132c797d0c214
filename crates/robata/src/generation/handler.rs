use async_trait::async_trait;
use tracing::{debug, error};

use crate::communication::QueueItem;
use crate::core::handler::BatchHandler;
use crate::error::JobFailed;
use super::core_trait::Generator;
use super::request::{GenerationRequest, JobOutcome};

/// Dispatch-side half of the engine: routes each job of a batch to the
/// matching variant of the owned model and delivers the outcome.
///
/// Jobs execute strictly in batch order. An abandoned job is skipped before
/// the model is ever invoked for it; a failing job has its cause logged and
/// its slot written with the failure marker, and the batch continues.
pub(crate) struct GenerationHandler<G> {
    /// The model, exclusively owned by the worker task.
    pub model: G,

    /// Vocabulary ids the long variant must never emit.
    pub denylist: Vec<u32>,
}

#[async_trait]
impl<G> BatchHandler for GenerationHandler<G>
where
    G: Generator + Send + Sync + 'static,
{
    type Job = QueueItem<GenerationRequest, JobOutcome>;

    async fn process_batch(&self, batch: Vec<Self::Job>) {
        for job in batch {
            if job.is_abandoned() {
                debug!(id = %job.id(), "job abandoned by its submitter; skipping");
                continue;
            }

            let outcome = match job.request() {
                GenerationRequest::Short {
                    prompt,
                    num_samples,
                } => self.model.complete_short(prompt, *num_samples).await,
                GenerationRequest::Long {
                    prompt,
                    num_samples,
                    length,
                } => {
                    self.model
                        .complete_long(prompt, *num_samples, *length, &self.denylist)
                        .await
                }
            };

            let outcome = outcome.map_err(|cause| {
                error!(
                    id = %job.id(),
                    variant = job.request().variant(),
                    %cause,
                    "processing variant failed"
                );
                JobFailed
            });

            if job.deliver(outcome).is_err() {
                debug!("submitter went away before result delivery");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GenerateError;
    use crate::generation::request::SampleMap;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use tokio::sync::oneshot;

    /// Records every invocation; fails when the prompt is "fail".
    struct EchoModel {
        seen: Mutex<Vec<String>>,
    }

    impl EchoModel {
        fn new() -> Self {
            Self {
                seen: Mutex::new(vec![]),
            }
        }
    }

    #[async_trait]
    impl Generator for EchoModel {
        async fn complete_short(
            &self,
            prompt: &str,
            num_samples: usize,
        ) -> Result<SampleMap, GenerateError> {
            self.seen.lock().unwrap().push(format!("short:{prompt}"));
            if prompt == "fail" {
                return Err(GenerateError::Model("forced failure".to_string()));
            }
            Ok((0..num_samples).map(|idx| (idx, "tok".to_string())).collect())
        }

        async fn complete_long(
            &self,
            prompt: &str,
            num_samples: usize,
            length: usize,
            denylist: &[u32],
        ) -> Result<SampleMap, GenerateError> {
            self.seen
                .lock()
                .unwrap()
                .push(format!("long:{prompt}:{length}:{}", denylist.len()));
            Ok((0..num_samples)
                .map(|idx| (idx, format!("continuation {idx}")))
                .collect())
        }
    }

    fn job(
        request: GenerationRequest,
    ) -> (
        QueueItem<GenerationRequest, JobOutcome>,
        oneshot::Receiver<JobOutcome>,
    ) {
        let (tx, rx) = oneshot::channel();
        (QueueItem::new(request, tx), rx)
    }

    fn short(prompt: &str) -> GenerationRequest {
        GenerationRequest::Short {
            prompt: prompt.to_string(),
            num_samples: 2,
        }
    }

    #[tokio::test]
    async fn routes_on_the_request_tag() {
        let handler = GenerationHandler {
            model: EchoModel::new(),
            denylist: vec![3, 7],
        };

        let (short_job, short_rx) = job(short("hello"));
        let (long_job, long_rx) = job(GenerationRequest::Long {
            prompt: "the sky".to_string(),
            num_samples: 1,
            length: 20,
        });

        handler.process_batch(vec![short_job, long_job]).await;

        assert_eq!(
            *handler.model.seen.lock().unwrap(),
            vec!["short:hello".to_string(), "long:the sky:20:2".to_string()],
        );
        assert!(short_rx.await.unwrap().is_ok());
        assert!(long_rx.await.unwrap().is_ok());
    }

    #[tokio::test]
    async fn a_failing_job_gets_the_marker_and_the_batch_continues() {
        let handler = GenerationHandler {
            model: EchoModel::new(),
            denylist: vec![],
        };

        let (first, first_rx) = job(short("one"));
        let (bad, bad_rx) = job(short("fail"));
        let (last, last_rx) = job(short("three"));

        handler.process_batch(vec![first, bad, last]).await;

        assert!(first_rx.await.unwrap().is_ok());
        assert_eq!(bad_rx.await.unwrap(), Err(JobFailed));
        assert!(last_rx.await.unwrap().is_ok());
    }

    #[tokio::test]
    async fn abandoned_jobs_never_reach_the_model() {
        let handler = GenerationHandler {
            model: EchoModel::new(),
            denylist: vec![],
        };

        let (abandoned, abandoned_rx) = job(short("unwanted"));
        drop(abandoned_rx);
        let (kept, kept_rx) = job(short("kept"));

        handler.process_batch(vec![abandoned, kept]).await;

        assert_eq!(
            *handler.model.seen.lock().unwrap(),
            vec!["short:kept".to_string()],
        );
        assert!(kept_rx.await.unwrap().is_ok());
    }
}
