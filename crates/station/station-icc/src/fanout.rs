//! Single-publisher, multi-subscriber fan-out with bounded per-subscriber
//! queues.
//!
//! # Design
//! - **Publisher**: calls [`Fanout::publish`] once per tick. Every
//!   subscriber gets a clone of the same item (for `Arc<str>` that is a
//!   refcount bump, the payload is serialized once).
//! - **Subscribers**: each owns a bounded FIFO. `publish` never waits on a
//!   subscriber: a full queue drops that subscriber's copy of the tick and
//!   nobody else's.
//!
//! The registry has its own lock, separate from whatever state the item was
//! built from. `publish` holds it shared, `subscribe`/`unsubscribe` and the
//! pruning of dead receivers hold it exclusive, so a subscriber can never be
//! removed halfway through a publish.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, TryRecvError, TrySendError};
use parking_lot::RwLock;
use tracing::{debug, trace};

/// Registry key for one subscriber.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriberId(pub u64);

impl fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub-{}", self.0)
    }
}

/// Outcome of one [`Fanout::publish`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PublishReport {
    /// Queued successfully.
    pub delivered: usize,
    /// Skipped because the subscriber's queue was full.
    pub dropped: usize,
    /// Receiver gone; pruned from the registry after the publish.
    pub disconnected: usize,
}

struct SlotEntry<T> {
    tx: Sender<T>,
    dropped: Arc<AtomicU64>,
}

/// Subscriber registry plus the publish operation.
pub struct Fanout<T: Clone> {
    subscribers: RwLock<HashMap<SubscriberId, SlotEntry<T>>>,
    next_id: AtomicU64,
    depth: usize,
}

/// Receiving half handed to a subscriber's writer task.
///
/// Dropping it disconnects the queue; the next publish prunes the entry.
pub struct Subscription<T> {
    id: SubscriberId,
    rx: Receiver<T>,
    dropped: Arc<AtomicU64>,
}

impl<T: Clone> Fanout<T> {
    /// Creates an empty registry whose subscribers queue up to `depth` items.
    /// A depth of 0 is raised to 1.
    pub fn new(depth: usize) -> Self {
        Self {
            subscribers: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
            depth: depth.max(1),
        }
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.read().len()
    }

    pub fn subscribe(&self) -> Subscription<T> {
        let id = SubscriberId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let (tx, rx) = crossbeam_channel::bounded(self.depth);
        let dropped = Arc::new(AtomicU64::new(0));
        self.subscribers.write().insert(
            id,
            SlotEntry {
                tx,
                dropped: dropped.clone(),
            },
        );
        debug!(%id, depth = self.depth, "subscriber registered");
        Subscription { id, rx, dropped }
    }

    /// Removes `id`. Returns false if it was already gone.
    pub fn unsubscribe(&self, id: SubscriberId) -> bool {
        let removed = self.subscribers.write().remove(&id).is_some();
        if removed {
            debug!(%id, "subscriber removed");
        }
        removed
    }

    /// Offers `item` to every subscriber without blocking.
    pub fn publish(&self, item: T) -> PublishReport {
        let mut report = PublishReport::default();
        let mut dead = Vec::new();

        {
            let subs = self.subscribers.read();
            for (id, entry) in subs.iter() {
                match entry.tx.try_send(item.clone()) {
                    Ok(()) => report.delivered += 1,
                    Err(TrySendError::Full(_)) => {
                        entry.dropped.fetch_add(1, Ordering::Relaxed);
                        report.dropped += 1;
                        trace!(%id, "queue full, tick dropped");
                    }
                    Err(TrySendError::Disconnected(_)) => {
                        report.disconnected += 1;
                        dead.push(*id);
                    }
                }
            }
        }

        if !dead.is_empty() {
            let mut subs = self.subscribers.write();
            for id in dead {
                subs.remove(&id);
                debug!(%id, "pruned disconnected subscriber");
            }
        }

        report
    }
}

impl<T> Subscription<T> {
    pub fn id(&self) -> SubscriberId {
        self.id
    }

    /// Waits up to `timeout` for the next item.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<T, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }

    pub fn try_recv(&self) -> Result<T, TryRecvError> {
        self.rx.try_recv()
    }

    /// The underlying queue, for waiting on it alongside other channels.
    pub fn receiver(&self) -> &Receiver<T> {
        &self.rx
    }

    /// Items currently waiting in the queue.
    pub fn pending(&self) -> usize {
        self.rx.len()
    }

    /// Ticks dropped for this subscriber because its queue was full.
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}
