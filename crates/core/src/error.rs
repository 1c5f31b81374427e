//! Domain error model.
//!
//! Each calculator owns one failure kind. Store and orchestration failures live
//! in `restock-infra`; nothing here performs IO.

use thiserror::Error;

/// Operator input did not have the shape of a sales row.
///
/// Recoverable: the orchestrator re-prompts on this error.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The row did not contain exactly one value per product line.
    #[error("exactly {expected} values required, you provided {actual}")]
    WrongCount { expected: usize, actual: usize },

    /// A token could not be read as an integer. `position` is zero-based.
    #[error("value {token:?} at position {position} is not an integer")]
    NotInteger { position: usize, token: String },
}

/// Two vectors that must be aligned column-for-column had different lengths.
///
/// Signals a corrupted store rather than an operator mistake.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("vector length mismatch: {left} vs {right}")]
pub struct DimensionError {
    pub left: usize,
    pub right: usize,
}

impl DimensionError {
    pub fn new(left: usize, right: usize) -> Self {
        Self { left, right }
    }
}

/// A product line had no recorded sales to forecast from.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("no sales history for product line {product_line}")]
pub struct InsufficientHistoryError {
    /// Zero-based column of the first empty product line.
    pub product_line: usize,
}
