//! Worksheet store boundary.
//!
//! The pipeline persists every row through this abstraction: a set of named
//! worksheets, each an append-only table of text cells with one column per
//! product line. Adapters decide where the cells actually live.

pub mod in_memory;
pub mod json_file;
pub mod r#trait;

pub use in_memory::InMemoryWorksheetStore;
pub use json_file::JsonFileWorksheetStore;
pub use r#trait::{StoreError, Worksheet, WorksheetStore};
