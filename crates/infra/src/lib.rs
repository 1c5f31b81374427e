//! Infrastructure layer: worksheet stores, configuration, pipeline wiring.

pub mod config;
pub mod pipeline;
pub mod worksheet;


pub use config::{ConfigError, RestockConfig, WorksheetNames};
pub use pipeline::{Orchestrator, PipelineError, RunReport, SalesInput, ScriptedInput};
pub use worksheet::{InMemoryWorksheetStore, JsonFileWorksheetStore, StoreError, Worksheet, WorksheetStore};
