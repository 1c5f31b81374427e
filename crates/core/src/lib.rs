//! `restock-core` — shared value types for the restocking pipeline.
//!
//! This crate contains **pure domain** primitives (no IO, no storage).

pub mod error;
pub mod id;
pub mod item_vector;
pub mod value_object;

pub use error::{DimensionError, InsufficientHistoryError, ValidationError};
pub use id::RunId;
pub use item_vector::ItemVector;
pub use value_object::ValueObject;
