//! Structured records for named-field value transitions.

use crate::record::{ChangeRecord, SourceId};
use std::borrow::Cow;

/// Identifier of a field within an observed object.
///
/// Most call sites use `&'static str` literals; owned strings are accepted
/// for dynamically named fields.
pub type PropertyKey = Cow<'static, str>;

/// A named field that moved from one value to another.
///
/// Constructed by [`PropertyChangeNotifier`](crate::core::PropertyChangeNotifier)
/// only when the old and new values actually differ.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FieldChange<V> {
    /// The notifier instance that produced this record.
    pub source: SourceId,
    /// The field that changed.
    pub field: PropertyKey,
    /// Value before the mutation.
    pub old: V,
    /// Value after the mutation.
    pub new: V,
}

/// Change record carried by keyed-change notifiers.
///
/// The `Unspecified` variant is the sentinel published when a delivery was
/// requested without any specific record.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PropertyChange<V> {
    /// Something about the owning object changed; no field-level detail.
    Unspecified,
    /// A single named field changed value.
    Field(FieldChange<V>),
}

impl<V> PropertyChange<V> {
    /// The field-level detail, if this record carries any.
    pub fn as_field(&self) -> Option<&FieldChange<V>> {
        match self {
            Self::Field(change) => Some(change),
            Self::Unspecified => None,
        }
    }
}

impl<V> ChangeRecord for PropertyChange<V>
where
    V: Clone + Send + Sync + 'static,
{
    fn unspecified() -> Self {
        Self::Unspecified
    }

    fn is_unspecified(&self) -> bool {
        matches!(self, Self::Unspecified)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinel_has_no_field_detail() {
        let record: PropertyChange<i32> = PropertyChange::unspecified();
        assert!(record.is_unspecified());
        assert!(record.as_field().is_none());
    }

    #[test]
    fn field_record_exposes_its_detail() {
        let record = PropertyChange::Field(FieldChange {
            source: SourceId::new(),
            field: PropertyKey::from("port"),
            old: 8080,
            new: 9090,
        });

        assert!(!record.is_unspecified());
        let change = record.as_field().unwrap();
        assert_eq!(change.field, "port");
        assert_eq!(change.old, 8080);
        assert_eq!(change.new, 9090);
    }
}
