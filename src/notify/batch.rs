//! Immutable snapshots of delivered change batches.

use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

/// An ordered, immutable snapshot of the change records delivered in one
/// processing turn.
///
/// Cloning a batch shares the underlying allocation, so handing the same
/// batch to many subscribers is cheap. Records cannot be mutated through a
/// batch in any build mode: a batch already delivered to one subscriber can
/// never be retroactively altered by another.
pub struct ChangeBatch<C> {
    records: Arc<[C]>,
}

impl<C> ChangeBatch<C> {
    pub(crate) fn new(records: Vec<C>) -> Self {
        Self {
            records: records.into(),
        }
    }

    /// The records in this batch, in the order they were enqueued.
    pub fn records(&self) -> &[C] {
        &self.records
    }
}

impl<C> Clone for ChangeBatch<C> {
    fn clone(&self) -> Self {
        Self {
            records: Arc::clone(&self.records),
        }
    }
}

impl<C> Deref for ChangeBatch<C> {
    type Target = [C];

    fn deref(&self) -> &[C] {
        &self.records
    }
}

impl<C: fmt::Debug> fmt::Debug for ChangeBatch<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.records.iter()).finish()
    }
}

impl<C: PartialEq> PartialEq for ChangeBatch<C> {
    fn eq(&self, other: &Self) -> bool {
        self.records == other.records
    }
}

impl<C: Eq> Eq for ChangeBatch<C> {}

impl<'a, C> IntoIterator for &'a ChangeBatch<C> {
    type Item = &'a C;
    type IntoIter = std::slice::Iter<'a, C>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preserves_append_order() {
        let batch = ChangeBatch::new(vec![1, 2, 3]);
        assert_eq!(batch.records(), &[1, 2, 3]);
        assert_eq!(batch.len(), 3);
    }

    #[test]
    fn clone_shares_the_snapshot() {
        let batch = ChangeBatch::new(vec!["a", "b"]);
        let clone = batch.clone();
        assert_eq!(batch, clone);
        assert_eq!(batch.records().as_ptr(), clone.records().as_ptr());
    }

    #[test]
    fn iterates_by_reference() {
        let batch = ChangeBatch::new(vec![10, 20]);
        let collected: Vec<i32> = (&batch).into_iter().copied().collect();
        assert_eq!(collected, vec![10, 20]);
    }
}
