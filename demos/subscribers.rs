//! Example demonstrating turn-coalesced change batches with multiple
//! subscribers.
//!
//! This example shows how to:
//! - Subscribe more than one stream to the same notifier
//! - Coalesce several synchronous notifications into one batch
//! - Unsubscribe by dropping streams
//!
//! Run with: cargo run --example subscribers

use batch_notify::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq)]
enum InventoryChange {
    Any,
    Added(&'static str),
    Removed(&'static str),
}

impl ChangeRecord for InventoryChange {
    fn unspecified() -> Self {
        Self::Any
    }

    fn is_unspecified(&self) -> bool {
        matches!(self, Self::Any)
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    println!("=== Batched Notification Example ===\n");

    let notifier: ChangeNotifier<InventoryChange> = ChangeNotifier::builder()
        .on_observed(|| println!("[engine] first subscriber arrived"))
        .on_unobserved(|| println!("[engine] last subscriber left, resources released"))
        .build();

    let mut audit = notifier.changes();
    let mut ui = notifier.changes();
    println!("Subscribed 2 streams\n");

    println!("--- Turn 1: three synchronous mutations ---");
    notifier.notify_change(Some(InventoryChange::Added("apples")));
    notifier.notify_change(Some(InventoryChange::Added("pears")));
    notifier.notify_change(Some(InventoryChange::Removed("plums")));

    let batch = audit.next().await.expect("audit batch");
    println!("[audit] one batch, {} records: {:?}", batch.len(), batch.records());
    let batch = ui.next().await.expect("ui batch");
    println!("[ui]    one batch, {} records: {:?}", batch.len(), batch.records());

    println!("\n--- Turn 2: unspecified change ---");
    notifier.notify_change(None);
    let batch = audit.next().await.expect("audit batch");
    println!("[audit] sentinel batch: {:?}", batch.records());
    let _ = ui.next().await;

    println!("\n--- Dropping both streams ---");
    drop(audit);
    drop(ui);
    println!("has_observers: {}", notifier.has_observers());

    println!("\nExample complete!");
}
