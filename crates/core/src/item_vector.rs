//! One integer per tracked product line.

use serde::{Deserialize, Serialize};

use crate::error::DimensionError;
use crate::value_object::ValueObject;

/// Ordered per-product-line counts (sales, stock, surplus or forecast).
///
/// Position `i` refers to the same product line in every vector of a run.
/// The type does not know N; callers that need a fixed width check it with
/// [`ItemVector::ensure_len`] or [`ItemVector::ensure_same_len`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemVector(Vec<i64>);

impl ValueObject for ItemVector {}

impl ItemVector {
    pub fn new(values: Vec<i64>) -> Self {
        Self(values)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<i64> {
        self.0.get(index).copied()
    }

    pub fn as_slice(&self) -> &[i64] {
        &self.0
    }

    pub fn iter(&self) -> core::slice::Iter<'_, i64> {
        self.0.iter()
    }

    pub fn into_inner(self) -> Vec<i64> {
        self.0
    }

    /// Render each value as a worksheet cell.
    pub fn to_cells(&self) -> Vec<String> {
        self.0.iter().map(i64::to_string).collect()
    }

    pub fn ensure_len(&self, expected: usize) -> Result<(), DimensionError> {
        if self.len() != expected {
            return Err(DimensionError::new(self.len(), expected));
        }
        Ok(())
    }

    pub fn ensure_same_len(&self, other: &ItemVector) -> Result<(), DimensionError> {
        other.ensure_len(self.len()).map_err(|_| DimensionError::new(self.len(), other.len()))
    }
}

impl From<Vec<i64>> for ItemVector {
    fn from(values: Vec<i64>) -> Self {
        Self(values)
    }
}

impl From<ItemVector> for Vec<i64> {
    fn from(value: ItemVector) -> Self {
        value.0
    }
}

impl FromIterator<i64> for ItemVector {
    fn from_iter<I: IntoIterator<Item = i64>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a ItemVector {
    type Item = &'a i64;
    type IntoIter = core::slice::Iter<'a, i64>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl AsRef<[i64]> for ItemVector {
    fn as_ref(&self) -> &[i64] {
        &self.0
    }
}

impl core::fmt::Display for ItemVector {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("[")?;
        for (i, v) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{v}")?;
        }
        f.write_str("]")
    }
}
