//! Builder for constructing notifier instances.

use crate::core::notifier::{DEFAULT_CHANNEL_CAPACITY, EngineShared, EngineState, Hook};
use crate::core::{ChangeNotifier, PropertyChangeNotifier};
use crate::record::{ChangeRecord, PropertyChange};
use parking_lot::Mutex;
use std::sync::Arc;

#[cfg(feature = "metrics")]
use crate::metrics::NotifyMetrics;

/// Builder for constructing a [`ChangeNotifier`].
///
/// Provides a fluent interface for the pieces that cannot change after
/// construction: lifecycle hooks and the subscription channel capacity.
///
/// # Examples
///
/// ```rust
/// use batch_notify::prelude::*;
///
/// let notifier = ChangeNotifier::builder()
///     .channel_capacity(16)
///     .on_observed(|| println!("first subscriber arrived"))
///     .on_unobserved(|| println!("last subscriber left"))
///     .build::<AnyChange>();
///
/// assert!(!notifier.has_observers());
/// ```
#[derive(Default)]
pub struct ChangeNotifierBuilder {
    capacity: Option<usize>,
    observed: Option<Hook>,
    unobserved: Option<Hook>,
    #[cfg(feature = "metrics")]
    metrics: Option<NotifyMetrics>,
}

impl ChangeNotifierBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set how many undelivered batches the subscription channel retains per
    /// subscriber. A subscriber that falls further behind observes a lag
    /// error and skips to the oldest retained batch. Defaults to 64.
    ///
    /// # Panics
    ///
    /// The first subscription panics if the capacity is zero.
    pub fn channel_capacity(mut self, capacity: usize) -> Self {
        self.capacity = Some(capacity);
        self
    }

    /// Run a hook on every 0 -> 1 subscriber transition.
    pub fn on_observed<F>(mut self, hook: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.observed = Some(Box::new(hook));
        self
    }

    /// Run a hook on every 1 -> 0 subscriber transition.
    ///
    /// The engine releases the subscription channel and any queued records
    /// itself before the hook runs; the hook is for additional cleanup only.
    pub fn on_unobserved<F>(mut self, hook: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.unobserved = Some(Box::new(hook));
        self
    }

    /// Record engine activity with the provided metrics collector.
    #[cfg(feature = "metrics")]
    pub fn with_metrics(mut self, metrics: NotifyMetrics) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Build the notifier.
    pub fn build<C: ChangeRecord>(self) -> ChangeNotifier<C> {
        ChangeNotifier::from_shared(Arc::new(EngineShared {
            state: Mutex::new(EngineState::empty()),
            observed: self.observed,
            unobserved: self.unobserved,
            capacity: self.capacity.unwrap_or(DEFAULT_CHANNEL_CAPACITY),
            #[cfg(feature = "metrics")]
            metrics: self.metrics,
        }))
    }

    /// Build a keyed-change notifier around the configured engine.
    pub fn build_keyed<V>(self) -> PropertyChangeNotifier<V>
    where
        V: Clone + PartialEq + Send + Sync + 'static,
    {
        PropertyChangeNotifier::with_engine(self.build::<PropertyChange<V>>())
    }
}

impl ChangeNotifier<()> {
    /// Create a builder for configuring hooks and channel capacity.
    ///
    /// The record type is chosen at [`build`](ChangeNotifierBuilder::build)
    /// time, so the builder itself is not generic.
    pub fn builder() -> ChangeNotifierBuilder {
        ChangeNotifierBuilder::new()
    }
}
