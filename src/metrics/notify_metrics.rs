//! Metrics collector for notifier activity.

use opentelemetry::metrics::{Counter, Gauge, Histogram, Meter};

/// Metrics collector for notifier activity.
///
/// Tracks enqueued records, delivered batches, deliveries skipped because
/// every subscriber left, batch sizes, and the active subscriber count.
///
/// # Examples
///
/// ```rust,no_run
/// use batch_notify::metrics::NotifyMetrics;
/// use opentelemetry::global;
///
/// let meter = global::meter("batch-notify");
/// let metrics = NotifyMetrics::new(meter);
/// metrics.record_enqueue();
/// metrics.record_delivery(3);
/// ```
#[derive(Clone)]
pub struct NotifyMetrics {
    records_enqueued: Counter<u64>,
    deliveries: Counter<u64>,
    deliveries_skipped: Counter<u64>,
    batch_size: Histogram<f64>,
    active_subscribers: Gauge<i64>,
}

impl NotifyMetrics {
    /// Create a new metrics collector with the provided meter.
    pub fn new(meter: Meter) -> Self {
        let records_enqueued = meter
            .u64_counter("batch_notify.records.enqueued")
            .with_description("Total number of change records enqueued")
            .build();

        let deliveries = meter
            .u64_counter("batch_notify.deliveries")
            .with_description("Number of batches published to subscribers")
            .build();

        let deliveries_skipped = meter
            .u64_counter("batch_notify.deliveries.skipped")
            .with_description("Deliveries that found no remaining subscribers")
            .build();

        let batch_size = meter
            .f64_histogram("batch_notify.batch.size")
            .with_description("Records per delivered batch")
            .build();

        let active_subscribers = meter
            .i64_gauge("batch_notify.subscribers.active")
            .with_description("Number of active subscribers")
            .build();

        Self {
            records_enqueued,
            deliveries,
            deliveries_skipped,
            batch_size,
            active_subscribers,
        }
    }

    /// Record one enqueued change record.
    pub fn record_enqueue(&self) {
        self.records_enqueued.add(1, &[]);
    }

    /// Record one published batch and its size.
    pub fn record_delivery(&self, batch_len: usize) {
        self.deliveries.add(1, &[]);
        self.batch_size.record(batch_len as f64, &[]);
    }

    /// Record a delivery that found no remaining subscribers.
    pub fn record_skipped_delivery(&self) {
        self.deliveries_skipped.add(1, &[]);
    }

    /// Update the number of active subscribers.
    pub fn update_subscriber_count(&self, count: i64) {
        self.active_subscribers.record(count, &[]);
    }
}
