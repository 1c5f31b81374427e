use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use restock_core::ItemVector;

use super::r#trait::{StoreError, Worksheet, WorksheetStore};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
struct StoreDocument {
    worksheets: BTreeMap<String, Worksheet>,
}

/// Worksheet store backed by a single JSON document on disk.
///
/// Every operation re-reads the file, so rows appended by another process
/// between runs are visible. Writes go to a sibling temp file which is then
/// renamed over the original. A missing file reads as a store with no
/// worksheets.
#[derive(Debug)]
pub struct JsonFileWorksheetStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileWorksheetStore {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create an empty worksheet unless one with this name already exists.
    ///
    /// Returns `true` when the worksheet was created.
    pub fn ensure_worksheet(&self, name: &str, header: Vec<String>) -> Result<bool, StoreError> {
        let _guard = self.lock()?;
        let mut doc = self.load()?;
        if doc.worksheets.contains_key(name) {
            return Ok(false);
        }
        doc.worksheets
            .insert(name.to_string(), Worksheet::with_header(header));
        self.save(&doc)?;
        tracing::info!(worksheet = name, path = %self.path.display(), "worksheet created");
        Ok(true)
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, ()>, StoreError> {
        self.write_lock
            .lock()
            .map_err(|_| StoreError::Backend("lock poisoned".to_string()))
    }

    fn load(&self) -> Result<StoreDocument, StoreError> {
        match fs::read(&self.path) {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(StoreDocument::default()),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, doc: &StoreDocument) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let bytes = serde_json::to_vec_pretty(doc)?;
        let tmp = self.path.with_extension(format!("tmp-{}", uuid::Uuid::now_v7()));
        fs::write(&tmp, bytes)?;
        if let Err(e) = fs::rename(&tmp, &self.path) {
            let _ = fs::remove_file(&tmp);
            return Err(e.into());
        }
        Ok(())
    }

    fn worksheet(&self, name: &str) -> Result<Worksheet, StoreError> {
        let _guard = self.lock()?;
        self.load()?
            .worksheets
            .remove(name)
            .ok_or_else(|| StoreError::WorksheetNotFound(name.to_string()))
    }
}

impl WorksheetStore for JsonFileWorksheetStore {
    fn get_all_values(&self, worksheet: &str) -> Result<Vec<Vec<String>>, StoreError> {
        Ok(self.worksheet(worksheet)?.rows)
    }

    fn get_column(&self, worksheet: &str, column: usize) -> Result<Vec<String>, StoreError> {
        Ok(self.worksheet(worksheet)?.column(column))
    }

    fn append_row(&self, worksheet: &str, row: &ItemVector) -> Result<(), StoreError> {
        let _guard = self.lock()?;
        let mut doc = self.load()?;
        let ws = doc
            .worksheets
            .get_mut(worksheet)
            .ok_or_else(|| StoreError::WorksheetNotFound(worksheet.to_string()))?;
        ws.rows.push(row.to_cells());
        self.save(&doc)
    }
}
