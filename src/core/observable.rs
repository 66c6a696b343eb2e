//! Capability trait for types whose state changes can be observed.

use crate::notify::ChangeStream;
use crate::record::ChangeRecord;

/// Capability for a type whose state changes are observable as batched,
/// turn-coalesced notifications.
///
/// Implemented by [`ChangeNotifier`](crate::core::ChangeNotifier) and
/// [`PropertyChangeNotifier`](crate::core::PropertyChangeNotifier).
/// Application types gain the capability by composing a notifier and
/// forwarding to it:
///
/// ```rust
/// use batch_notify::prelude::*;
///
/// struct Counter {
///     value: u64,
///     notifier: PropertyChangeNotifier<u64>,
/// }
///
/// impl Counter {
///     fn increment(&mut self) {
///         let old = self.value;
///         self.value = self.notifier.notify_property_change("value", &old, old + 1);
///     }
/// }
///
/// impl Observable for Counter {
///     type Change = PropertyChange<u64>;
///
///     fn changes(&self) -> ChangeStream<Self::Change> {
///         self.notifier.changes()
///     }
///
///     fn has_observers(&self) -> bool {
///         self.notifier.has_observers()
///     }
///
///     fn notify_change(&self, record: Option<Self::Change>) {
///         self.notifier.notify_change(record)
///     }
///
///     fn deliver_changes(&self) -> bool {
///         self.notifier.deliver_changes()
///     }
/// }
///
/// let mut counter = Counter {
///     value: 0,
///     notifier: PropertyChangeNotifier::new(),
/// };
/// // Nobody is subscribed, so this records nothing.
/// counter.increment();
/// assert_eq!(counter.value, 1);
/// assert!(!counter.has_observers());
/// ```
pub trait Observable {
    /// The change-record type carried in this observable's batches.
    type Change: ChangeRecord;

    /// Subscribe to batched change deliveries.
    fn changes(&self) -> ChangeStream<Self::Change>;

    /// Whether at least one subscriber is currently listening.
    fn has_observers(&self) -> bool;

    /// Buffer a change record, or with `None` request an unspecified-change
    /// delivery, for publication at the end of the current turn.
    fn notify_change(&self, record: Option<Self::Change>);

    /// Run a pending delivery now instead of waiting for the turn boundary.
    /// Returns `true` if a batch was published.
    fn deliver_changes(&self) -> bool;
}
