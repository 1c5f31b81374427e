//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value**. Two sales rows
/// holding the same counts are the same row as far as the pipeline cares;
/// there is no identity to track.
///
/// ```ignore
/// let a = ItemVector::from(vec![10, 20, 30]);
/// let b = ItemVector::from(vec![10, 20, 30]);
/// assert_eq!(a, b);
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
