//! Static configuration of the dispatch engine.
//!
//! These are process-lifetime constants, not runtime-tunable settings. Batch
//! capacity is the engine's `const S: usize` parameter; [`DEFAULT_BATCH_SIZE`]
//! is the value adapters use unless they have a reason not to.

use std::time::Duration;

/// How long the dispatch loop waits on the work signal before re-checking the
/// queue and the shutdown flag. Timing out here is an expected empty-queue
/// condition, not an error.
pub const CHECK_INTERVAL: Duration = Duration::from_millis(100);

/// Default batch capacity. One job per batch degenerates the collector to
/// strict one-at-a-time processing; larger capacities are first-class.
pub const DEFAULT_BATCH_SIZE: usize = 1;

/// Vocabulary ids the long variant must never emit, passed to
/// [`crate::generation::Generator::complete_long`] on every invocation.
pub const DEFAULT_DENYLIST: &[u32] = &[
    10134, 318, 1716, 373, 655, 198, 468, 1394, 1464, 790, 4477, 867, 3236,
    4858, 1588, 1263, 1029, 3607, 1838, 1049, 9812, 12465, 2048, 617, 423,
    7448, 389, 550, 1595, 470,
];
