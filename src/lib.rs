//! # batch-notify
//!
//! Turn-coalesced change notifications with batched asynchronous delivery
//! for observable state.
//!
//! ## Overview
//!
//! `batch-notify` provides an observable-state primitive for UI and
//! data-binding scenarios where many synchronous mutations happen within a
//! single logical operation. Instead of one notification per mutation,
//! subscribers see one coalesced batch per processing turn:
//!
//! - A [`ChangeNotifier`](core::ChangeNotifier) buffers change records and
//!   schedules at most one delivery per turn
//! - All subscribers receive the same batches in the same order
//! - Notifying with no subscribers costs one lock acquisition and nothing
//!   else; the channel and queue only exist while someone is listening
//! - A [`PropertyChangeNotifier`](core::PropertyChangeNotifier) layers
//!   old/new value comparison and structured records on top
//!
//! ## Quick Start
//!
//! ```rust
//! use batch_notify::prelude::*;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let notifier: ChangeNotifier<AnyChange> = ChangeNotifier::new();
//! let mut changes = notifier.changes();
//!
//! // Many synchronous notifications within one turn...
//! notifier.notify_change(Some(AnyChange));
//! notifier.notify_change(Some(AnyChange));
//! notifier.notify_change(Some(AnyChange));
//!
//! // ...coalesce into a single batch at the turn boundary.
//! let batch = changes.next().await.unwrap();
//! assert_eq!(batch.len(), 3);
//! # }
//! ```
//!
//! ## Delivery model
//!
//! The first `notify_change` in a turn spawns one delivery task onto the
//! ambient Tokio runtime; the task runs after the currently executing
//! synchronous code completes. Until it runs, further notifications append
//! to the same pending batch. `deliver_changes` runs the same operation
//! eagerly for explicit processing cycles and is a no-op when nothing is
//! pending.
//!
//! Ordering holds per notifier instance: records within a batch appear in
//! call order, batches across turns in scheduling order. Independent
//! notifier instances are not ordered relative to each other.
//!
//! ## Feature Flags
//!
//! - `metrics`: OpenTelemetry counters for enqueues, deliveries, and
//!   subscriber counts
//! - `tracing`: emit tracing events for deliveries and lifecycle transitions
//! - `serde`: `Serialize`/`Deserialize` for the bundled record types

#![warn(missing_docs, rust_2024_compatibility)]
#![deny(unsafe_code)]

pub mod core;
pub mod error;
pub mod notify;
pub mod record;

#[cfg(feature = "metrics")]
pub mod metrics;

/// Convenient re-exports for common usage patterns.
pub mod prelude {
    pub use crate::core::{ChangeNotifier, ChangeNotifierBuilder, Observable, PropertyChangeNotifier};
    pub use crate::error::{NotifyError, Result};
    pub use crate::notify::{ChangeBatch, ChangeStream};
    pub use crate::record::{
        AnyChange, ChangeRecord, FieldChange, PropertyChange, PropertyKey, SourceId,
    };
}
