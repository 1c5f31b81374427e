use serde::{Deserialize, Serialize};
use thiserror::Error;

use restock_core::ItemVector;
use std::sync::Arc;

/// Worksheet store operation error.
///
/// These are **infrastructure errors** (missing worksheet, IO, corrupt
/// document) as opposed to domain errors (validation, dimensions). The
/// pipeline propagates them unmodified and does not retry.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("worksheet not found: {0}")]
    WorksheetNotFound(String),

    #[error("store io failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("store document is malformed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("store backend failure: {0}")]
    Backend(String),
}

/// One named table: a header row plus chronologically ordered data rows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Worksheet {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Worksheet {
    pub fn with_header(header: Vec<String>) -> Self {
        Self {
            header,
            rows: Vec::new(),
        }
    }

    /// Cells of one zero-based column, oldest first. Rows too short to have
    /// the column are skipped.
    pub fn column(&self, column: usize) -> Vec<String> {
        self.rows
            .iter()
            .filter_map(|row| row.get(column).cloned())
            .collect()
    }
}

/// Append-only access to named worksheets.
///
/// ## Read Semantics
///
/// - Rows come back oldest first; the most recent row is the last element.
/// - The header row is never part of the returned data.
/// - A missing worksheet is `StoreError::WorksheetNotFound`, never an empty
///   result.
///
/// ## Write Semantics
///
/// `append_row()` adds exactly one row at the end of the worksheet and is
/// atomic from the caller's point of view: the row is either stored or an
/// error is returned.
///
/// There is no isolation between a read and a later append. A second writer
/// appending in between is not detected.
pub trait WorksheetStore: Send + Sync {
    /// All data rows of a worksheet, oldest first.
    fn get_all_values(&self, worksheet: &str) -> Result<Vec<Vec<String>>, StoreError>;

    /// One zero-based column of a worksheet, oldest first.
    fn get_column(&self, worksheet: &str, column: usize) -> Result<Vec<String>, StoreError> {
        let rows = self.get_all_values(worksheet)?;
        Ok(rows
            .into_iter()
            .filter_map(|mut row| (column < row.len()).then(|| row.swap_remove(column)))
            .collect())
    }

    /// Append one row at the end of a worksheet.
    fn append_row(&self, worksheet: &str, row: &ItemVector) -> Result<(), StoreError>;
}

impl<S> WorksheetStore for Arc<S>
where
    S: WorksheetStore + ?Sized,
{
    fn get_all_values(&self, worksheet: &str) -> Result<Vec<Vec<String>>, StoreError> {
        (**self).get_all_values(worksheet)
    }

    fn get_column(&self, worksheet: &str, column: usize) -> Result<Vec<String>, StoreError> {
        (**self).get_column(worksheet, column)
    }

    fn append_row(&self, worksheet: &str, row: &ItemVector) -> Result<(), StoreError> {
        (**self).append_row(worksheet, row)
    }
}
