use std::collections::HashMap;
use std::sync::RwLock;

use restock_core::ItemVector;

use super::r#trait::{StoreError, Worksheet, WorksheetStore};

/// In-memory worksheet store.
///
/// Intended for tests, dry runs and non-interactive embeddings.
#[derive(Debug, Default)]
pub struct InMemoryWorksheetStore {
    worksheets: RwLock<HashMap<String, Worksheet>>,
}

impl InMemoryWorksheetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`ensure_worksheet`](Self::ensure_worksheet).
    pub fn with_worksheet(self, name: impl Into<String>, header: Vec<String>) -> Self {
        if let Ok(mut sheets) = self.worksheets.write() {
            sheets.entry(name.into()).or_insert_with(|| Worksheet::with_header(header));
        }
        self
    }

    /// Create an empty worksheet unless one with this name already exists.
    pub fn ensure_worksheet(&self, name: &str, header: Vec<String>) -> Result<(), StoreError> {
        let mut sheets = self
            .worksheets
            .write()
            .map_err(|_| StoreError::Backend("lock poisoned".to_string()))?;
        sheets
            .entry(name.to_string())
            .or_insert_with(|| Worksheet::with_header(header));
        Ok(())
    }

    /// Snapshot of one worksheet, header included.
    pub fn worksheet(&self, name: &str) -> Result<Worksheet, StoreError> {
        let sheets = self
            .worksheets
            .read()
            .map_err(|_| StoreError::Backend("lock poisoned".to_string()))?;
        sheets
            .get(name)
            .cloned()
            .ok_or_else(|| StoreError::WorksheetNotFound(name.to_string()))
    }
}

impl WorksheetStore for InMemoryWorksheetStore {
    fn get_all_values(&self, worksheet: &str) -> Result<Vec<Vec<String>>, StoreError> {
        Ok(self.worksheet(worksheet)?.rows)
    }

    fn get_column(&self, worksheet: &str, column: usize) -> Result<Vec<String>, StoreError> {
        let sheets = self
            .worksheets
            .read()
            .map_err(|_| StoreError::Backend("lock poisoned".to_string()))?;
        sheets
            .get(worksheet)
            .map(|ws| ws.column(column))
            .ok_or_else(|| StoreError::WorksheetNotFound(worksheet.to_string()))
    }

    fn append_row(&self, worksheet: &str, row: &ItemVector) -> Result<(), StoreError> {
        let mut sheets = self
            .worksheets
            .write()
            .map_err(|_| StoreError::Backend("lock poisoned".to_string()))?;
        let ws = sheets
            .get_mut(worksheet)
            .ok_or_else(|| StoreError::WorksheetNotFound(worksheet.to_string()))?;
        ws.rows.push(row.to_cells());
        Ok(())
    }
}
