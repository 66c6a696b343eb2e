//! Keyed-change convenience layer over the notifier engine.

use crate::core::{ChangeNotifier, Observable};
use crate::notify::ChangeStream;
use crate::record::{FieldChange, PropertyChange, PropertyKey, SourceId};

/// A notifier specialized for named-field value transitions.
///
/// Composes a [`ChangeNotifier`] carrying [`PropertyChange`] records and
/// stamps every record with this instance's [`SourceId`]. Because the
/// keyed-change operation only exists on this type, calling it against an
/// engine of a different record type is a compile-time mismatch rather than
/// a runtime error.
///
/// # Examples
///
/// ```rust
/// use batch_notify::prelude::*;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let notifier: PropertyChangeNotifier<u16> = PropertyChangeNotifier::new();
/// let mut changes = notifier.changes();
///
/// // Equal values record nothing; a real change records one transition.
/// notifier.notify_property_change("port", &8080, 8080);
/// let port = notifier.notify_property_change("port", &8080, 9090);
/// assert_eq!(port, 9090);
///
/// let batch = changes.next().await.unwrap();
/// let change = batch[0].as_field().unwrap();
/// assert_eq!(change.field, "port");
/// assert_eq!(change.old, 8080);
/// assert_eq!(change.new, 9090);
/// # }
/// ```
pub struct PropertyChangeNotifier<V> {
    source: SourceId,
    engine: ChangeNotifier<PropertyChange<V>>,
}

impl<V> PropertyChangeNotifier<V>
where
    V: Clone + PartialEq + Send + Sync + 'static,
{
    /// Create a keyed-change notifier with default engine settings.
    pub fn new() -> Self {
        Self::with_engine(ChangeNotifier::new())
    }

    /// Wrap a pre-configured engine (hooks, channel capacity).
    pub fn with_engine(engine: ChangeNotifier<PropertyChange<V>>) -> Self {
        Self {
            source: SourceId::new(),
            engine,
        }
    }

    /// The id stamped into every record this notifier produces.
    pub fn source_id(&self) -> SourceId {
        self.source
    }

    /// Record that `field` moved from `old` to `new`, if anyone cares.
    ///
    /// A no-op when nobody is subscribed or when the values compare equal;
    /// otherwise one [`FieldChange`] record is enqueued for the turn's batch.
    /// Always returns `new` unchanged, so a mutation site can compute and
    /// assign through it:
    ///
    /// ```rust
    /// # use batch_notify::prelude::*;
    /// # struct Inner { value: u32, notifier: PropertyChangeNotifier<u32> }
    /// # impl Inner {
    /// fn set_value(&mut self, value: u32) {
    ///     let old = self.value;
    ///     self.value = self.notifier.notify_property_change("value", &old, value);
    /// }
    /// # }
    /// ```
    pub fn notify_property_change(&self, field: impl Into<PropertyKey>, old: &V, new: V) -> V {
        if !self.engine.has_observers() || *old == new {
            return new;
        }
        let record = PropertyChange::Field(FieldChange {
            source: self.source,
            field: field.into(),
            old: old.clone(),
            new: new.clone(),
        });
        self.engine.notify_change(Some(record));
        new
    }

    /// Subscribe to batched change deliveries. See
    /// [`ChangeNotifier::changes`].
    pub fn changes(&self) -> ChangeStream<PropertyChange<V>> {
        self.engine.changes()
    }

    /// Whether at least one subscriber is currently listening.
    pub fn has_observers(&self) -> bool {
        self.engine.has_observers()
    }

    /// The number of active subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.engine.subscriber_count()
    }

    /// Buffer a raw record, or request an unspecified-change delivery. See
    /// [`ChangeNotifier::notify_change`].
    pub fn notify_change(&self, record: Option<PropertyChange<V>>) {
        self.engine.notify_change(record)
    }

    /// Run a pending delivery now. See [`ChangeNotifier::deliver_changes`].
    pub fn deliver_changes(&self) -> bool {
        self.engine.deliver_changes()
    }
}

impl<V> Default for PropertyChangeNotifier<V>
where
    V: Clone + PartialEq + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<V> Clone for PropertyChangeNotifier<V> {
    fn clone(&self) -> Self {
        Self {
            source: self.source,
            engine: self.engine.clone(),
        }
    }
}

impl<V> Observable for PropertyChangeNotifier<V>
where
    V: Clone + PartialEq + Send + Sync + 'static,
{
    type Change = PropertyChange<V>;

    fn changes(&self) -> ChangeStream<PropertyChange<V>> {
        PropertyChangeNotifier::changes(self)
    }

    fn has_observers(&self) -> bool {
        PropertyChangeNotifier::has_observers(self)
    }

    fn notify_change(&self, record: Option<PropertyChange<V>>) {
        PropertyChangeNotifier::notify_change(self, record)
    }

    fn deliver_changes(&self) -> bool {
        PropertyChangeNotifier::deliver_changes(self)
    }
}
