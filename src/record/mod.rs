//! Change-record shapes consumed and produced by the notifier engine.
//!
//! The engine treats records as opaque payloads: it appends them to batches
//! in call order and otherwise never looks inside them. The one thing it
//! needs from every record type is a sentinel value standing for "something
//! changed" when a notification is requested without a specific record.

mod property;

pub use property::{FieldChange, PropertyChange, PropertyKey};

use std::sync::atomic::{AtomicU64, Ordering};

/// A unit of observed change.
///
/// Records are immutable once handed to the engine. Implementations must be
/// cheap to clone: every subscriber of a notifier receives its own handle to
/// the delivered batch.
pub trait ChangeRecord: Clone + Send + Sync + 'static {
    /// The sentinel record meaning "something changed" with no further
    /// detail. Published as a single-element batch when a delivery was
    /// requested but no record was enqueued.
    fn unspecified() -> Self;

    /// Whether this record is the unspecified-change sentinel.
    fn is_unspecified(&self) -> bool;
}

/// Minimal change record for callers that only care *that* something
/// changed, not what.
///
/// # Examples
///
/// ```rust
/// use batch_notify::record::{AnyChange, ChangeRecord};
///
/// assert!(AnyChange.is_unspecified());
/// assert_eq!(AnyChange::unspecified(), AnyChange);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnyChange;

impl ChangeRecord for AnyChange {
    fn unspecified() -> Self {
        AnyChange
    }

    fn is_unspecified(&self) -> bool {
        true
    }
}

/// Process-unique identifier for the notifier instance that produced a
/// record.
///
/// Minted from an atomic counter, so ids stay unique across threads and a
/// record never has to borrow the object it describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SourceId(u64);

impl SourceId {
    /// Mint a fresh, unique id.
    pub fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for SourceId {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_ids_are_unique() {
        let id1 = SourceId::new();
        let id2 = SourceId::new();
        let id3 = SourceId::new();

        assert_ne!(id1, id2);
        assert_ne!(id2, id3);
        assert_ne!(id1, id3);
    }

    #[test]
    fn any_change_is_always_the_sentinel() {
        assert!(AnyChange.is_unspecified());
        assert_eq!(AnyChange::unspecified(), AnyChange);
    }
}
