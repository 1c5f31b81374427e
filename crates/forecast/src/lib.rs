//! `restock-forecast`
//!
//! **Responsibility:** recommend the next stock order from recent sales.
//!
//! The engine is deterministic and pure:
//! - It reads a trailing window of sales per product line.
//! - It never touches the store; callers fetch history and persist results.

pub mod engine;
pub mod uplift;
pub mod window;

pub use engine::{DEFAULT_WINDOW, ForecastEngine, forecast_stock};
pub use uplift::{UpliftError, UpliftFactor};
pub use window::HistoricalSalesWindow;
