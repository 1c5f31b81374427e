use thiserror::Error;

use restock_core::{DimensionError, ItemVector};

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SurplusError {
    #[error(transparent)]
    Dimension(#[from] DimensionError),

    /// `stock - sales` does not fit in an `i64`.
    #[error("surplus overflow at product line {position}")]
    Overflow { position: usize },
}

/// Per-product-line surplus: `stock[i] - sales[i]`.
///
/// Positive values are unsold stock (waste), negative values are demand that
/// exceeded what was on hand. Both vectors must have the same length; nothing
/// is truncated.
pub fn compute_surplus(sales: &ItemVector, stock: &ItemVector) -> Result<ItemVector, SurplusError> {
    sales.ensure_same_len(stock)?;

    sales
        .iter()
        .zip(stock.iter())
        .enumerate()
        .map(|(position, (&sold, &on_hand))| {
            on_hand
                .checked_sub(sold)
                .ok_or(SurplusError::Overflow { position })
        })
        .collect::<Result<Vec<_>, _>>()
        .map(ItemVector::new)
}
