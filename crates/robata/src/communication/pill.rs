use std::thread;

/// # Pill
///
/// A panic tripwire carried by the worker task.
///
/// The dispatch loop is designed to outlive any panic raised while a batch is
/// processing, so an unwind that reaches the task body means the loop's own
/// bookkeeping failed. The `Pill` is moved into the task at spawn time; if it
/// is ever dropped during a panic, it raises again so the death of the worker
/// cannot pass silently inside the runtime.
pub(crate) struct Pill {}

impl Pill {
    pub fn new() -> Self {
        Self {}
    }
}

impl Drop for Pill {
    fn drop(&mut self) {
        if thread::panicking() {
            panic!("dispatch worker panicked outside batch processing");
        }
    }
}
