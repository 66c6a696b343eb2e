//! Example demonstrating keyed property-change notifications with the
//! compute-and-assign pattern.
//!
//! Run with: cargo run --example property_changes

use batch_notify::prelude::*;

struct Thermostat {
    target: i32,
    notifier: PropertyChangeNotifier<i32>,
}

impl Thermostat {
    fn new() -> Self {
        Self {
            target: 20,
            notifier: PropertyChangeNotifier::new(),
        }
    }

    fn set_target(&mut self, target: i32) {
        let old = self.target;
        self.target = self.notifier.notify_property_change("target", &old, target);
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    println!("=== Property Change Example ===\n");

    let mut thermostat = Thermostat::new();
    let mut changes = thermostat.notifier.changes();

    // A redundant assignment records nothing; real changes within the same
    // turn coalesce into one batch.
    thermostat.set_target(20);
    thermostat.set_target(22);
    thermostat.set_target(25);

    let batch = changes.next().await.expect("batch");
    println!("One batch with {} records:", batch.len());
    for record in &batch {
        if let Some(change) = record.as_field() {
            println!("  {}: {} -> {}", change.field, change.old, change.new);
        }
    }

    println!("\nFinal target: {}", thermostat.target);
    println!("Example complete!");
}
