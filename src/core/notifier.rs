//! The batching notifier engine.

use crate::core::{ChangeNotifierBuilder, Observable};
use crate::notify::{ChangeBatch, ChangeStream};
use crate::record::ChangeRecord;
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::broadcast;

#[cfg(feature = "metrics")]
use crate::metrics::NotifyMetrics;

/// How many undelivered batches the subscription channel retains per
/// subscriber before the oldest are dropped for a lagging one.
pub(crate) const DEFAULT_CHANNEL_CAPACITY: usize = 64;

/// Lifecycle hook installed via the builder.
pub(crate) type Hook = Box<dyn Fn() + Send + Sync>;

/// Mutable engine state, guarded by one per-instance lock.
pub(crate) struct EngineState<C> {
    /// Lazily created on first subscription, dropped on last unsubscribe.
    channel: Option<broadcast::Sender<ChangeBatch<C>>>,
    /// Allocated on first enqueue, taken by each delivery.
    pending: Option<Vec<C>>,
    /// True from scheduling a delivery until that delivery completes.
    delivery_scheduled: bool,
    /// Active subscriber count, maintained for queries only.
    subscribers: usize,
}

impl<C> EngineState<C> {
    pub(crate) fn empty() -> Self {
        Self {
            channel: None,
            pending: None,
            delivery_scheduled: false,
            subscribers: 0,
        }
    }
}

/// State shared between notifier handles, streams, and delivery tasks.
pub(crate) struct EngineShared<C> {
    pub(crate) state: Mutex<EngineState<C>>,
    pub(crate) observed: Option<Hook>,
    pub(crate) unobserved: Option<Hook>,
    pub(crate) capacity: usize,
    #[cfg(feature = "metrics")]
    pub(crate) metrics: Option<NotifyMetrics>,
}

impl<C> EngineShared<C> {
    /// Deregister one subscriber. On the 1 -> 0 transition the channel and
    /// any queued records are released before the `on_unobserved` hook runs,
    /// so an idle notifier retains no memory.
    pub(crate) fn subscriber_dropped(&self) {
        let (released, _remaining) = {
            let mut state = self.state.lock();
            state.subscribers -= 1;
            let released = state.subscribers == 0;
            if released {
                state.channel = None;
                state.pending = None;
            }
            (released, state.subscribers)
        };

        #[cfg(feature = "metrics")]
        if let Some(metrics) = &self.metrics {
            metrics.update_subscriber_count(_remaining as i64);
        }

        if released {
            #[cfg(feature = "tracing")]
            tracing::debug!("last subscriber left, notifier released");
            if let Some(hook) = &self.unobserved {
                hook();
            }
        }
    }
}

impl<C: ChangeRecord> EngineShared<C> {
    /// Run one delivery if one is due. This is exactly the operation the
    /// scheduled turn-end task performs; manual `deliver_changes` calls go
    /// through here as well.
    pub(crate) fn deliver(&self) -> bool {
        let (sender, batch) = {
            let mut state = self.state.lock();
            if !state.delivery_scheduled {
                return false;
            }
            state.delivery_scheduled = false;
            let pending = state.pending.take();

            let Some(sender) = state.channel.clone() else {
                // Everyone unsubscribed between scheduling and delivery;
                // the release already discarded the queue.
                debug_assert!(pending.is_none());
                #[cfg(feature = "metrics")]
                if let Some(metrics) = &self.metrics {
                    metrics.record_skipped_delivery();
                }
                return false;
            };

            let records = match pending {
                Some(records) if !records.is_empty() => records,
                _ => vec![C::unspecified()],
            };
            (sender, ChangeBatch::new(records))
        };

        #[cfg(feature = "tracing")]
        tracing::debug!(records = batch.len(), "delivering change batch");
        #[cfg(feature = "metrics")]
        if let Some(metrics) = &self.metrics {
            metrics.record_delivery(batch.len());
        }

        // Published outside the lock: the channel works from its own snapshot
        // of receivers, and a subscriber may unsubscribe mid-send.
        let _ = sender.send(batch);
        true
    }
}

/// The batching notifier engine.
///
/// Accumulates change records produced by synchronous mutations and delivers
/// them to all subscribers as one batch per processing turn. Cloning yields
/// another handle to the same engine.
///
/// # Examples
///
/// ```rust
/// use batch_notify::prelude::*;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let notifier: ChangeNotifier<AnyChange> = ChangeNotifier::new();
/// let mut changes = notifier.changes();
///
/// // Many synchronous notifications within one turn...
/// notifier.notify_change(Some(AnyChange));
/// notifier.notify_change(Some(AnyChange));
///
/// // ...arrive as a single batch at the turn boundary.
/// let batch = changes.next().await.unwrap();
/// assert_eq!(batch.len(), 2);
/// # }
/// ```
pub struct ChangeNotifier<C> {
    shared: Arc<EngineShared<C>>,
}

impl<C: ChangeRecord> ChangeNotifier<C> {
    /// Create a notifier with default settings.
    pub fn new() -> Self {
        ChangeNotifierBuilder::new().build()
    }

    pub(crate) fn from_shared(shared: Arc<EngineShared<C>>) -> Self {
        Self { shared }
    }

    /// Subscribe to batched change deliveries.
    ///
    /// The subscription channel is created lazily on the first subscription,
    /// which also runs the `on_observed` hook. Every concurrent subscriber
    /// receives the same batches in the same order.
    pub fn changes(&self) -> ChangeStream<C> {
        let (receiver, first, _count) = {
            let mut state = self.shared.state.lock();
            let sender = state
                .channel
                .get_or_insert_with(|| broadcast::channel(self.shared.capacity).0);
            let receiver = sender.subscribe();
            state.subscribers += 1;
            (receiver, state.subscribers == 1, state.subscribers)
        };

        #[cfg(feature = "metrics")]
        if let Some(metrics) = &self.shared.metrics {
            metrics.update_subscriber_count(_count as i64);
        }

        if first {
            #[cfg(feature = "tracing")]
            tracing::debug!("first subscriber arrived");
            if let Some(hook) = &self.shared.observed {
                hook();
            }
        }

        ChangeStream::new(receiver, Arc::downgrade(&self.shared))
    }

    /// Whether at least one subscriber is currently listening.
    ///
    /// Pure query with no side effects. Callers use it to skip expensive
    /// change-record construction when nobody would see the result.
    pub fn has_observers(&self) -> bool {
        let state = self.shared.state.lock();
        state.channel.is_some() && state.subscribers > 0
    }

    /// The number of active subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.shared.state.lock().subscribers
    }

    /// Buffer a change for delivery at the end of the current turn.
    ///
    /// Without observers this is a no-op and the record is dropped; no queue
    /// is allocated just to discard data. With `Some(record)` the record is
    /// appended to the pending queue in call order. With `None` the eventual
    /// delivery publishes the unspecified-change sentinel if the queue is
    /// still empty at that point.
    ///
    /// The first call in a turn spawns exactly one delivery task onto the
    /// ambient Tokio runtime; further calls in the same turn coalesce into
    /// that delivery. On a current-thread runtime the task runs as soon as
    /// the currently running task yields, before any later-due timer or I/O
    /// event. Never suspends and returns immediately.
    ///
    /// # Panics
    ///
    /// Panics if called with observers present from outside a Tokio runtime,
    /// since the delivery task has nowhere to run.
    pub fn notify_change(&self, record: Option<C>) {
        let schedule = {
            let mut state = self.shared.state.lock();
            if state.subscribers == 0 {
                return;
            }
            if let Some(record) = record {
                state.pending.get_or_insert_with(Vec::new).push(record);
                #[cfg(feature = "metrics")]
                if let Some(metrics) = &self.shared.metrics {
                    metrics.record_enqueue();
                }
            }
            if state.delivery_scheduled {
                false
            } else {
                state.delivery_scheduled = true;
                true
            }
        };

        if schedule {
            self.schedule_delivery();
        }
    }

    /// Run a pending delivery now instead of waiting for the turn boundary.
    ///
    /// Safe to call at any time: when nothing is pending it returns `false`
    /// with no observable effect. When a delivery is pending and observers
    /// remain, the pending queue (or the unspecified-change sentinel, if the
    /// queue is empty) is snapshotted, the queue and the scheduled flag are
    /// cleared together, and the snapshot is published to all current
    /// subscribers as one batch; returns `true`. When a delivery is pending
    /// but every subscriber already left, the flag is cleared without
    /// publishing and the call returns `false`.
    pub fn deliver_changes(&self) -> bool {
        self.shared.deliver()
    }

    // The task holds a weak reference: a notifier dropped before its turn
    // boundary must not be kept alive by its own delivery task.
    fn schedule_delivery(&self) {
        let shared = Arc::downgrade(&self.shared);
        tokio::spawn(async move {
            if let Some(shared) = shared.upgrade() {
                shared.deliver();
            }
        });
    }
}

impl<C: ChangeRecord> Default for ChangeNotifier<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> Clone for ChangeNotifier<C> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<C: ChangeRecord> Observable for ChangeNotifier<C> {
    type Change = C;

    fn changes(&self) -> ChangeStream<C> {
        ChangeNotifier::changes(self)
    }

    fn has_observers(&self) -> bool {
        ChangeNotifier::has_observers(self)
    }

    fn notify_change(&self, record: Option<C>) {
        ChangeNotifier::notify_change(self, record)
    }

    fn deliver_changes(&self) -> bool {
        ChangeNotifier::deliver_changes(self)
    }
}
