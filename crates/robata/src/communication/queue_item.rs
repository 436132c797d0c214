use tokio::sync::oneshot::Sender;
use uuid::Uuid;

/// # QueueItem
///
/// One unit of submitted work: a request paired with the single-use channel
/// its result is delivered on.
///
/// The item's lifecycle is Pending → Completed, exactly once: delivery
/// consumes the sender, so a result slot can never be overwritten or reset.
/// Between dequeue and delivery the dispatcher exclusively owns the item;
/// before and after, the submitting task only observes it through the
/// receiving half.
///
/// ## Type Parameters
///
/// * `Q` - The request payload to be processed
/// * `T` - The outcome delivered back to the submitter
pub(crate) struct QueueItem<Q, T> {
    /// Opaque identity, used only for log correlation.
    id: Uuid,

    /// The request payload to be processed.
    request: Q,

    /// Channel the outcome is delivered on, exactly once.
    sender: Sender<T>,
}

impl<Q, T> QueueItem<Q, T> {
    pub fn new(request: Q, sender: Sender<T>) -> Self {
        Self {
            id: Uuid::new_v4(),
            request,
            sender,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn request(&self) -> &Q {
        &self.request
    }

    /// True once the submitting task has dropped its receiving half. The
    /// dispatcher skips abandoned items without invoking the worker.
    pub fn is_abandoned(&self) -> bool {
        self.sender.is_closed()
    }

    /// Delivers the outcome, consuming the item. Returns the outcome back
    /// when the receiver is already gone.
    pub fn deliver(self, outcome: T) -> Result<(), T> {
        self.sender.send(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::oneshot;

    #[tokio::test]
    async fn items_get_unique_ids() {
        let (tx1, _rx1) = oneshot::channel::<u8>();
        let (tx2, _rx2) = oneshot::channel::<u8>();

        let first = QueueItem::new("a", tx1);
        let second = QueueItem::new("b", tx2);

        assert_ne!(first.id(), second.id());
    }

    #[tokio::test]
    async fn delivery_reaches_the_submitter() {
        let (tx, rx) = oneshot::channel();
        let item = QueueItem::new(42, tx);

        assert_eq!(*item.request(), 42);
        item.deliver("done").expect("receiver is alive");

        assert_eq!(rx.await.expect("slot was written"), "done");
    }

    #[tokio::test]
    async fn dropping_the_receiver_abandons_the_item() {
        let (tx, rx) = oneshot::channel::<&str>();
        let item = QueueItem::new("unwanted", tx);

        assert!(!item.is_abandoned());
        drop(rx);
        assert!(item.is_abandoned());

        // Delivery to an abandoned item hands the outcome back.
        assert_eq!(item.deliver("late"), Err("late"));
    }
}
