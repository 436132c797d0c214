//! # Robata
//!
//! A batching dispatcher that exposes a single compute-bound text-generation
//! worker to many concurrent callers.
//!
//! ## Overview
//!
//! Robata serializes all model execution on one long-lived worker task.
//! Callers submit tagged generation requests from arbitrary tasks; the engine
//! queues them in arrival order, collects batches of a fixed capacity, runs
//! each job of a batch against the model sequentially, and resolves each
//! caller's future with that job's outcome. At most one processing-variant
//! invocation executes at any instant. That invariant is enforced by
//! construction: the model is moved into the worker task when the engine is
//! created and is never reachable from a submitting task.
//!
//! ## Architecture
//!
//! The crate is built around a few key pieces:
//!
//! - [`generation::Generator`] - the two opaque processing variants ("short"
//!   next-token sampling and "long" continuation generation) implemented by
//!   whatever model the engine is constructed with.
//! - [`generation::GenerationBatchInference`] - the engine: a FIFO work queue,
//!   a batch collector driven by a polling timeout, and the dispatch loop that
//!   routes each job to its variant.
//! - [`generation::GenerationBatcher`] - the submission surface. `submit`
//!   applies an admission check against the current queue depth and returns an
//!   [`Item`] future that resolves once the dispatcher writes the job's
//!   outcome. Dropping the future abandons the job.
//!
//! ## Failure Semantics
//!
//! A single job's failure never aborts its batch or the worker loop: the cause
//! is logged and the job's result slot is written with a distinguished failure
//! marker. A panic escaping batch processing fails only the batch in flight;
//! the loop logs it and resumes, so queued and future jobs are unaffected.
//!
//! ## Example
//!
//! ```ignore
//! use robata::config::DEFAULT_DENYLIST;
//! use robata::generation::{
//!     GenerationBatchInference,
//!     GenerationBatcher,
//!     GenerationRequest,
//! };
//!
//! // `MyModel` implements `robata::generation::Generator`.
//! let engine = GenerationBatchInference::<1>::new(MyModel::new(), DEFAULT_DENYLIST.to_vec());
//!
//! let item = engine
//!     .submit(GenerationRequest::Short {
//!         prompt: "hello".to_string(),
//!         num_samples: 3,
//!     })
//!     .await?;
//!
//! match item.await? {
//!     Ok(samples) => println!("{samples:?}"),
//!     Err(_failed) => eprintln!("generation failed"),
//! }
//! ```

mod communication;
mod core;

pub mod config;
pub mod error;
pub mod generation;

pub use communication::Item;
