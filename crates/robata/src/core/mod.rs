//! The dispatch half of the engine.
//!
//! * [`batch`] - The dispatch loop: collect a batch from the work queue,
//!   process it, repeat. Panic isolation for the batch in flight lives here.
//! * [`handler`] - The trait the loop drives; implementations route and
//!   execute every job of a collected batch.
//! * [`worker`] - Lifecycle handle for the single background dispatch task.

pub(crate) mod batch;
pub(crate) mod handler;
pub(crate) mod worker;
