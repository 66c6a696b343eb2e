//! Notifier activity metrics using OpenTelemetry.
//!
//! Available with the `metrics` feature. Build a [`NotifyMetrics`] from a
//! meter and hand it to the notifier builder:
//!
//! ```rust,no_run
//! use batch_notify::metrics::NotifyMetrics;
//! use batch_notify::prelude::*;
//! use opentelemetry::global;
//!
//! let metrics = NotifyMetrics::new(global::meter("batch-notify"));
//! let notifier = ChangeNotifier::builder()
//!     .with_metrics(metrics)
//!     .build::<AnyChange>();
//! ```

mod notify_metrics;

pub use notify_metrics::NotifyMetrics;
