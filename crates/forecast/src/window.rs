use serde::{Deserialize, Serialize};

/// Trailing sales per product line, newest value first.
///
/// One inner sequence per product line, in column order. Each sequence holds
/// at most the configured window size; it may be shorter when history is
/// young, and an empty sequence means the line has never sold.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoricalSalesWindow {
    lines: Vec<Vec<i64>>,
}

impl HistoricalSalesWindow {
    /// Wrap sequences that are already newest-first.
    pub fn from_newest_first(lines: Vec<Vec<i64>>) -> Self {
        Self { lines }
    }

    /// Build from chronological columns (oldest first), keeping the last
    /// `window` values of each column in newest-first order.
    pub fn from_columns<C>(columns: impl IntoIterator<Item = C>, window: usize) -> Self
    where
        C: AsRef<[i64]>,
    {
        let lines = columns
            .into_iter()
            .map(|column| column.as_ref().iter().rev().take(window).copied().collect())
            .collect();
        Self { lines }
    }

    /// Number of product lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn line(&self, index: usize) -> Option<&[i64]> {
        self.lines.get(index).map(Vec::as_slice)
    }

    pub fn lines(&self) -> impl Iterator<Item = &[i64]> {
        self.lines.iter().map(Vec::as_slice)
    }
}
