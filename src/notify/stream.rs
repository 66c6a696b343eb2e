//! Per-subscriber receiving side of a notifier.

use crate::core::EngineShared;
use crate::error::{NotifyError, Result};
use crate::notify::ChangeBatch;
use crate::record::ChangeRecord;
use std::sync::Weak;
use tokio::sync::broadcast;

/// A live subscription to a notifier's batched change deliveries.
///
/// Obtained from [`changes`](crate::core::ChangeNotifier::changes). Dropping
/// the stream unsubscribes; when the last stream for a notifier is dropped,
/// the notifier synchronously releases its subscription channel and any
/// queued records, then runs the `on_unobserved` hook.
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
/// notifier.notify_change(Some(AnyChange));
///
/// let batch = changes.next().await.unwrap();
/// assert_eq!(batch.len(), 1);
/// # }
/// ```
pub struct ChangeStream<C> {
    receiver: broadcast::Receiver<ChangeBatch<C>>,
    // Weak so an open stream does not keep a dropped notifier alive; the
    // channel closing is how the stream learns the notifier is gone.
    shared: Weak<EngineShared<C>>,
}

impl<C: ChangeRecord> ChangeStream<C> {
    pub(crate) fn new(
        receiver: broadcast::Receiver<ChangeBatch<C>>,
        shared: Weak<EngineShared<C>>,
    ) -> Self {
        Self { receiver, shared }
    }

    /// Receive the next delivered batch, reporting lag explicitly.
    ///
    /// If this subscriber fell more than the channel capacity behind, the
    /// skipped batches are gone for it and [`NotifyError::Lagged`] says how
    /// many; receiving again continues from the oldest retained batch.
    /// Returns [`NotifyError::Closed`] once every notifier handle has been
    /// dropped.
    pub async fn recv(&mut self) -> Result<ChangeBatch<C>> {
        self.receiver.recv().await.map_err(NotifyError::from)
    }

    /// Receive the next delivered batch, skipping over any lag.
    ///
    /// Returns `None` once every notifier handle has been dropped.
    pub async fn next(&mut self) -> Option<ChangeBatch<C>> {
        loop {
            match self.recv().await {
                Ok(batch) => return Some(batch),
                Err(NotifyError::Lagged { skipped: _skipped }) => {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(
                        skipped = _skipped,
                        "change stream lagged, skipping to newer batches"
                    );
                }
                Err(NotifyError::Closed) => return None,
            }
        }
    }
}

impl<C> Drop for ChangeStream<C> {
    fn drop(&mut self) {
        if let Some(shared) = self.shared.upgrade() {
            shared.subscriber_dropped();
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::core::ChangeNotifier;
    use crate::error::NotifyError;
    use crate::record::AnyChange;

    #[tokio::test]
    async fn recv_reports_closed_after_notifier_drop() {
        let notifier: ChangeNotifier<AnyChange> = ChangeNotifier::new();
        let mut changes = notifier.changes();

        drop(notifier);

        assert_eq!(changes.recv().await, Err(NotifyError::Closed));
        assert!(changes.next().await.is_none());
    }

    #[tokio::test]
    async fn recv_reports_lag_and_recovers() {
        let notifier = ChangeNotifier::builder()
            .channel_capacity(1)
            .build::<AnyChange>();
        let mut changes = notifier.changes();

        // Three turns of delivery against a capacity-1 channel.
        for _ in 0..3 {
            notifier.notify_change(Some(AnyChange));
            assert!(notifier.deliver_changes());
        }

        assert_eq!(
            changes.recv().await,
            Err(NotifyError::Lagged { skipped: 2 })
        );
        // The newest batch is still there.
        let batch = changes.recv().await.unwrap();
        assert_eq!(batch.len(), 1);
    }
}
