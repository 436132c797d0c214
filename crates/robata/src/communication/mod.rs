mod item;
mod pill;
mod queue;
mod queue_item;

pub use item::Item;
pub(crate) use pill::Pill;
pub(crate) use queue::WorkQueue;
pub(crate) use queue_item::QueueItem;
