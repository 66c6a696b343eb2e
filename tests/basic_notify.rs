//! Integration tests for the engine's batching and lifecycle contract.

use batch_notify::prelude::*;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::time::timeout;

#[derive(Clone, Debug, PartialEq, Eq)]
enum TestChange {
    Any,
    Tag(u32),
}

impl ChangeRecord for TestChange {
    fn unspecified() -> Self {
        Self::Any
    }

    fn is_unspecified(&self) -> bool {
        matches!(self, Self::Any)
    }
}

/// Asserts that no batch arrives on `changes` within a short window.
async fn assert_silent(changes: &mut ChangeStream<TestChange>) {
    assert!(
        timeout(Duration::from_millis(50), changes.next())
            .await
            .is_err(),
        "expected no batch to be delivered"
    );
}

#[tokio::test]
async fn notifications_without_observers_go_nowhere() {
    let notifier: ChangeNotifier<TestChange> = ChangeNotifier::new();
    assert!(!notifier.has_observers());

    notifier.notify_change(Some(TestChange::Tag(1)));
    notifier.notify_change(Some(TestChange::Tag(2)));
    notifier.notify_change(None);

    // No delivery was ever scheduled.
    assert!(!notifier.deliver_changes());

    // A later subscriber sees none of the dropped changes.
    let mut changes = notifier.changes();
    assert_silent(&mut changes).await;
}

#[tokio::test]
async fn synchronous_notifications_coalesce_into_one_batch() {
    let notifier: ChangeNotifier<TestChange> = ChangeNotifier::new();
    let mut changes = notifier.changes();

    notifier.notify_change(Some(TestChange::Tag(1)));
    notifier.notify_change(Some(TestChange::Tag(2)));
    notifier.notify_change(Some(TestChange::Tag(3)));

    let batch = changes.next().await.unwrap();
    assert_eq!(
        batch.records(),
        &[
            TestChange::Tag(1),
            TestChange::Tag(2),
            TestChange::Tag(3),
        ]
    );

    // Exactly one batch for the whole turn.
    assert_silent(&mut changes).await;
}

#[tokio::test]
async fn recordless_notification_delivers_the_sentinel() {
    let notifier: ChangeNotifier<TestChange> = ChangeNotifier::new();
    let mut changes = notifier.changes();

    notifier.notify_change(None);

    let batch = changes.next().await.unwrap();
    assert_eq!(batch.records(), &[TestChange::Any]);
    assert!(batch[0].is_unspecified());
}

#[tokio::test]
async fn manual_delivery_is_idempotent() {
    let notifier: ChangeNotifier<TestChange> = ChangeNotifier::new();
    let mut changes = notifier.changes();

    // Nothing pending: no-op.
    assert!(!notifier.deliver_changes());

    notifier.notify_change(Some(TestChange::Tag(7)));
    assert!(notifier.deliver_changes());

    let batch = changes.next().await.unwrap();
    assert_eq!(batch.records(), &[TestChange::Tag(7)]);

    // Drained: back to a no-op, and the turn-end task finds nothing either.
    assert!(!notifier.deliver_changes());
    assert_silent(&mut changes).await;
}

#[tokio::test]
async fn release_restores_the_unobserved_silence() {
    let notifier: ChangeNotifier<TestChange> = ChangeNotifier::new();
    let changes = notifier.changes();
    assert!(notifier.has_observers());
    assert_eq!(notifier.subscriber_count(), 1);

    drop(changes);
    assert!(!notifier.has_observers());
    assert_eq!(notifier.subscriber_count(), 0);

    // Silent again, exactly like a never-observed notifier.
    notifier.notify_change(Some(TestChange::Tag(1)));
    assert!(!notifier.deliver_changes());

    // And a fresh subscription starts from a clean slate.
    let mut changes = notifier.changes();
    notifier.notify_change(Some(TestChange::Tag(9)));
    let batch = changes.next().await.unwrap();
    assert_eq!(batch.records(), &[TestChange::Tag(9)]);
}

#[tokio::test]
async fn unsubscribing_before_the_turn_boundary_cancels_publication() {
    let notifier: ChangeNotifier<TestChange> = ChangeNotifier::new();
    let changes = notifier.changes();

    // Schedules a delivery...
    notifier.notify_change(Some(TestChange::Tag(1)));
    // ...but everyone leaves before it runs.
    drop(changes);

    assert!(!notifier.deliver_changes());

    let mut changes = notifier.changes();
    assert_silent(&mut changes).await;
}

#[tokio::test]
async fn property_changes_deduplicate_equal_values() {
    let notifier: PropertyChangeNotifier<i32> = PropertyChangeNotifier::new();
    let mut changes = notifier.changes();

    assert_eq!(notifier.notify_property_change("x", &5, 5), 5);
    assert!(!notifier.deliver_changes());

    assert_eq!(notifier.notify_property_change("x", &5, 6), 6);
    let batch = changes.next().await.unwrap();
    assert_eq!(batch.len(), 1);

    let change = batch[0].as_field().unwrap();
    assert_eq!(change.source, notifier.source_id());
    assert_eq!(change.field, "x");
    assert_eq!(change.old, 5);
    assert_eq!(change.new, 6);
}

#[tokio::test]
async fn lifecycle_hooks_track_the_edge_transitions() {
    let observed = Arc::new(AtomicUsize::new(0));
    let unobserved = Arc::new(AtomicUsize::new(0));

    let observed_hook = Arc::clone(&observed);
    let unobserved_hook = Arc::clone(&unobserved);
    let notifier = ChangeNotifier::builder()
        .on_observed(move || {
            observed_hook.fetch_add(1, Ordering::SeqCst);
        })
        .on_unobserved(move || {
            unobserved_hook.fetch_add(1, Ordering::SeqCst);
        })
        .build::<TestChange>();

    let first = notifier.changes();
    let second = notifier.changes();
    assert_eq!(observed.load(Ordering::SeqCst), 1);
    assert_eq!(notifier.subscriber_count(), 2);

    drop(first);
    assert_eq!(unobserved.load(Ordering::SeqCst), 0);
    drop(second);
    assert_eq!(unobserved.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn lagging_subscriber_gets_a_lag_error_then_catches_up() {
    let notifier = ChangeNotifier::builder()
        .channel_capacity(1)
        .build::<TestChange>();
    let mut changes = notifier.changes();

    for i in 0..3 {
        notifier.notify_change(Some(TestChange::Tag(i)));
        assert!(notifier.deliver_changes());
    }

    assert_eq!(
        changes.recv().await,
        Err(NotifyError::Lagged { skipped: 2 })
    );
    let batch = changes.recv().await.unwrap();
    assert_eq!(batch.records(), &[TestChange::Tag(2)]);
}
