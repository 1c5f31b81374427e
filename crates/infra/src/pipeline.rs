//! Restocking pipeline (application-level orchestration).
//!
//! ```text
//! operator line
//!   ↓
//! 1. Validate (re-prompt on rejection, optionally bounded)
//!   ↓
//! 2. Append sales row            → "sales"
//!   ↓
//! 3. Latest stock row − sales    → "surplus"
//!   ↓
//! 4. Trailing sales window → forecast → "stock"
//! ```
//!
//! Calculators are pure; every durable effect goes through the injected
//! [`WorksheetStore`]. A failure after step 2 leaves the rows already appended
//! in place. There is no rollback and no automatic retry of store calls.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use restock_core::{InsufficientHistoryError, ItemVector, RunId, ValidationError};
use restock_forecast::{ForecastEngine, HistoricalSalesWindow};
use restock_inventory::{SurplusError, compute_surplus};
use restock_sales::parse_sales_line;

use crate::config::RestockConfig;
use crate::worksheet::{StoreError, WorksheetStore};

#[derive(Debug, Error)]
pub enum PipelineError {
    /// The configured attempt bound was reached without a valid row.
    #[error("no valid sales input after {attempts} attempt(s): {last}")]
    AttemptsExhausted { attempts: u32, last: ValidationError },

    /// The input source ended before a valid row was entered.
    #[error("sales input closed before a valid row was entered")]
    InputClosed,

    #[error("reading sales input failed: {0}")]
    Input(#[source] std::io::Error),

    #[error("worksheet {worksheet:?} has no stock rows")]
    NoStockRecorded { worksheet: String },

    /// A stored cell could not be read back as an integer. `row` is the
    /// zero-based data row (header excluded).
    #[error("worksheet {worksheet:?} row {row} column {column} holds non-integer cell {cell:?}")]
    MalformedCell {
        worksheet: String,
        row: usize,
        column: usize,
        cell: String,
    },

    /// A stored row inside the sales window does not hold one cell per
    /// product line. `row` is the zero-based data row (header excluded).
    #[error("worksheet {worksheet:?} row {row} has {actual} cell(s), expected {expected}")]
    RowWidth {
        worksheet: String,
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error(transparent)]
    Surplus(#[from] SurplusError),

    #[error(transparent)]
    InsufficientHistory(#[from] InsufficientHistoryError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Source of operator-entered sales lines.
pub trait SalesInput {
    /// Next raw line, or `None` once the source is exhausted.
    fn read_line(&mut self) -> std::io::Result<Option<String>>;

    /// Called with each rejected line's error before the next read.
    fn reject(&mut self, _error: &ValidationError) {}
}

/// Pre-recorded lines, for non-interactive runs and tests.
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    lines: VecDeque<String>,
    rejections: Vec<ValidationError>,
}

impl ScriptedInput {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
            rejections: Vec::new(),
        }
    }

    /// Errors reported for rejected lines, in order.
    pub fn rejections(&self) -> &[ValidationError] {
        &self.rejections
    }
}

impl SalesInput for ScriptedInput {
    fn read_line(&mut self) -> std::io::Result<Option<String>> {
        Ok(self.lines.pop_front())
    }

    fn reject(&mut self, error: &ValidationError) {
        self.rejections.push(error.clone());
    }
}

/// Summary of one completed run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    pub run_id: RunId,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// Lines read until one validated (1 = first try).
    pub attempts: u32,
    pub sales: ItemVector,
    pub surplus: ItemVector,
    pub forecast: ItemVector,
}

/// Sequences one validate → record → surplus → forecast pass against a store.
#[derive(Debug)]
pub struct Orchestrator<S> {
    store: S,
    config: RestockConfig,
    engine: ForecastEngine,
}

impl<S> Orchestrator<S> {
    pub fn new(store: S, config: RestockConfig) -> Self {
        let engine = config.forecast_engine();
        Self {
            store,
            config,
            engine,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &RestockConfig {
        &self.config
    }

    pub fn into_store(self) -> S {
        self.store
    }
}

impl<S> Orchestrator<S>
where
    S: WorksheetStore,
{
    /// Run the whole pipeline once.
    pub fn run(&self, input: &mut impl SalesInput) -> Result<RunReport, PipelineError> {
        let run_id = RunId::new();
        let started_at = Utc::now();
        let span = tracing::info_span!("pipeline.run", %run_id);
        let _entered = span.enter();

        let (sales, attempts) = self.collect_sales(input)?;
        tracing::info!(attempts, sales = %sales, "sales input accepted");

        let sheets = &self.config.worksheets;
        self.record(&sheets.sales, &sales)?;

        let surplus = self.calculate_surplus(&sales)?;
        self.record(&sheets.surplus, &surplus)?;

        let window = self.trailing_sales_window()?;
        let forecast = self.engine.forecast(&window)?;
        self.record(&sheets.stock, &forecast)?;

        let finished_at = Utc::now();
        tracing::info!(
            forecast = %forecast,
            elapsed_ms = (finished_at - started_at).num_milliseconds(),
            "pipeline run complete"
        );

        Ok(RunReport {
            run_id,
            started_at,
            finished_at,
            attempts,
            sales,
            surplus,
            forecast,
        })
    }

    /// Read lines until one validates, honouring `max_attempts`.
    ///
    /// Returns the sales row and the number of lines read.
    pub fn collect_sales(&self, input: &mut impl SalesInput) -> Result<(ItemVector, u32), PipelineError> {
        let expected = self.config.product_line_count();
        let mut attempts: u32 = 0;

        loop {
            let line = input
                .read_line()
                .map_err(PipelineError::Input)?
                .ok_or(PipelineError::InputClosed)?;
            attempts = attempts.saturating_add(1);

            match parse_sales_line(&line, expected) {
                Ok(sales) => return Ok((sales, attempts)),
                Err(error) => {
                    tracing::warn!(attempt = attempts, %error, "sales input rejected");
                    input.reject(&error);
                    if let Some(max) = self.config.max_attempts {
                        if attempts >= max.get() {
                            return Err(PipelineError::AttemptsExhausted {
                                attempts,
                                last: error,
                            });
                        }
                    }
                }
            }
        }
    }

    /// Surplus of `sales` against the most recent stock row.
    pub fn calculate_surplus(&self, sales: &ItemVector) -> Result<ItemVector, PipelineError> {
        tracing::debug!("calculating surplus");
        let stock = self.latest_stock()?;
        Ok(compute_surplus(sales, &stock)?)
    }

    /// Last row of the stock worksheet.
    pub fn latest_stock(&self) -> Result<ItemVector, PipelineError> {
        let worksheet = &self.config.worksheets.stock;
        let rows = self.store.get_all_values(worksheet)?;
        let row_index = rows.len().checked_sub(1).ok_or_else(|| PipelineError::NoStockRecorded {
            worksheet: worksheet.clone(),
        })?;

        rows[row_index]
            .iter()
            .enumerate()
            .map(|(column, cell)| parse_cell(worksheet, row_index, column, cell))
            .collect()
    }

    /// Trailing window of every product line's sales column.
    ///
    /// Every row inside the window must hold exactly one cell per product
    /// line so all lines average over the same days.
    pub fn trailing_sales_window(&self) -> Result<HistoricalSalesWindow, PipelineError> {
        let worksheet = &self.config.worksheets.sales;
        let expected = self.config.product_line_count();
        let rows = self.store.get_all_values(worksheet)?;

        // Only the tail is used; older rows are never inspected.
        let skip = rows.len().saturating_sub(self.engine.window());
        let mut columns = vec![Vec::with_capacity(rows.len() - skip); expected];

        for (row_index, row) in rows.iter().enumerate().skip(skip) {
            if row.len() != expected {
                return Err(PipelineError::RowWidth {
                    worksheet: worksheet.clone(),
                    row: row_index,
                    expected,
                    actual: row.len(),
                });
            }
            for (column, cell) in row.iter().enumerate() {
                columns[column].push(parse_cell(worksheet, row_index, column, cell)?);
            }
        }

        Ok(self.engine.window_from_columns(columns))
    }

    fn record(&self, worksheet: &str, row: &ItemVector) -> Result<(), PipelineError> {
        self.store.append_row(worksheet, row)?;
        tracing::info!(worksheet, row = %row, "worksheet updated");
        Ok(())
    }
}

fn parse_cell(worksheet: &str, row: usize, column: usize, cell: &str) -> Result<i64, PipelineError> {
    cell.trim()
        .parse::<i64>()
        .map_err(|_| PipelineError::MalformedCell {
            worksheet: worksheet.to_string(),
            row,
            column,
            cell: cell.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroU32;

    use super::*;
    use crate::worksheet::InMemoryWorksheetStore;

    fn header() -> Vec<String> {
        RestockConfig::default().product_lines
    }

    fn store_with_stock(stock: &[i64]) -> InMemoryWorksheetStore {
        let store = InMemoryWorksheetStore::new()
            .with_worksheet("sales", header())
            .with_worksheet("stock", header())
            .with_worksheet("surplus", header());
        store
            .append_row("stock", &ItemVector::from(stock.to_vec()))
            .unwrap();
        store
    }

    #[test]
    fn retries_until_input_validates() {
        let orchestrator = Orchestrator::new(store_with_stock(&[0; 6]), RestockConfig::default());
        let mut input = ScriptedInput::new(["1,2,3", "a,b,c,d,e,f", "1,2,3,4,5,6"]);

        let (sales, attempts) = orchestrator.collect_sales(&mut input).unwrap();
        assert_eq!(sales.as_slice(), &[1, 2, 3, 4, 5, 6]);
        assert_eq!(attempts, 3);
        assert_eq!(input.rejections().len(), 2);
        assert!(matches!(input.rejections()[0], ValidationError::WrongCount { actual: 3, .. }));
        assert!(matches!(input.rejections()[1], ValidationError::NotInteger { position: 0, .. }));
    }

    #[test]
    fn bounded_retry_gives_up() {
        let config = RestockConfig {
            max_attempts: NonZeroU32::new(2),
            ..RestockConfig::default()
        };
        let orchestrator = Orchestrator::new(store_with_stock(&[0; 6]), config);
        let mut input = ScriptedInput::new(["x", "1,2", "1,2,3,4,5,6"]);

        let err = orchestrator.run(&mut input).unwrap_err();
        match err {
            PipelineError::AttemptsExhausted { attempts, last } => {
                assert_eq!(attempts, 2);
                assert!(matches!(last, ValidationError::WrongCount { actual: 2, .. }));
            }
            other => panic!("expected AttemptsExhausted, got {other:?}"),
        }
        assert!(orchestrator.store().get_all_values("sales").unwrap().is_empty());
    }

    #[test]
    fn exhausted_input_is_input_closed() {
        let orchestrator = Orchestrator::new(store_with_stock(&[0; 6]), RestockConfig::default());
        let mut input = ScriptedInput::new(["nope"]);
        assert!(matches!(
            orchestrator.run(&mut input),
            Err(PipelineError::InputClosed)
        ));
    }

    #[test]
    fn empty_stock_worksheet_fails_after_recording_sales() {
        let store = InMemoryWorksheetStore::new()
            .with_worksheet("sales", header())
            .with_worksheet("stock", header())
            .with_worksheet("surplus", header());
        let orchestrator = Orchestrator::new(store, RestockConfig::default());
        let mut input = ScriptedInput::new(["1,2,3,4,5,6"]);

        let err = orchestrator.run(&mut input).unwrap_err();
        assert!(matches!(err, PipelineError::NoStockRecorded { worksheet } if worksheet == "stock"));
        // Accepted inconsistency: the sales row stays.
        assert_eq!(orchestrator.store().get_all_values("sales").unwrap().len(), 1);
        assert!(orchestrator.store().get_all_values("surplus").unwrap().is_empty());
    }

    #[test]
    fn short_stock_row_is_a_dimension_error() {
        let orchestrator = Orchestrator::new(store_with_stock(&[1, 2, 3, 4, 5]), RestockConfig::default());
        let mut input = ScriptedInput::new(["1,2,3,4,5,6"]);

        let err = orchestrator.run(&mut input).unwrap_err();
        assert!(matches!(err, PipelineError::Surplus(SurplusError::Dimension(_))));
    }

    /// Store whose worksheets hold arbitrary text cells.
    struct RawCells(Vec<(&'static str, Vec<Vec<String>>)>);

    impl WorksheetStore for RawCells {
        fn get_all_values(&self, worksheet: &str) -> Result<Vec<Vec<String>>, StoreError> {
            self.0
                .iter()
                .find(|(name, _)| *name == worksheet)
                .map(|(_, rows)| rows.clone())
                .ok_or_else(|| StoreError::WorksheetNotFound(worksheet.to_string()))
        }

        fn append_row(&self, _worksheet: &str, _row: &ItemVector) -> Result<(), StoreError> {
            Err(StoreError::Backend("read-only".to_string()))
        }
    }

    fn cells(rows: &[&[&str]]) -> Vec<Vec<String>> {
        rows.iter()
            .map(|r| r.iter().map(|c| c.to_string()).collect())
            .collect()
    }

    #[test]
    fn malformed_stock_cell_is_reported() {
        let store = RawCells(vec![(
            "stock",
            cells(&[&["1", "2", "3", "4", "5", "6"], &["1", "2", "3.5", "4", "5", "6"]]),
        )]);
        let orchestrator = Orchestrator::new(store, RestockConfig::default());

        match orchestrator.latest_stock().unwrap_err() {
            PipelineError::MalformedCell {
                worksheet,
                row,
                column,
                cell,
            } => {
                assert_eq!(worksheet, "stock");
                assert_eq!((row, column), (1, 2));
                assert_eq!(cell, "3.5");
            }
            other => panic!("expected MalformedCell, got {other:?}"),
        }
    }

    #[test]
    fn stale_malformed_sales_outside_the_window_are_ignored() {
        let mut rows = cells(&[&["x", "x", "x", "x", "x", "x"]]);
        for _ in 0..5 {
            rows.extend(cells(&[&[" 10", "20 ", "30", "40", "50", "60"]]));
        }
        let orchestrator = Orchestrator::new(RawCells(vec![("sales", rows)]), RestockConfig::default());

        let window = orchestrator.trailing_sales_window().unwrap();
        assert_eq!(window.line(0), Some(&[10, 10, 10, 10, 10][..]));
        assert_eq!(window.line(1), Some(&[20, 20, 20, 20, 20][..]));
    }

    #[test]
    fn short_sales_row_inside_the_window_is_rejected() {
        let store = store_with_stock(&[0; 6]);
        store.append_row("sales", &ItemVector::from(vec![1, 1])).unwrap();
        store.append_row("sales", &ItemVector::from(vec![2; 6])).unwrap();
        let orchestrator = Orchestrator::new(store, RestockConfig::default());

        match orchestrator.trailing_sales_window().unwrap_err() {
            PipelineError::RowWidth {
                worksheet,
                row,
                expected,
                actual,
            } => {
                assert_eq!(worksheet, "sales");
                assert_eq!((row, expected, actual), (0, 6, 2));
            }
            other => panic!("expected RowWidth, got {other:?}"),
        }
    }

    #[test]
    fn short_sales_row_older_than_the_window_is_ignored() {
        let store = store_with_stock(&[0; 6]);
        store.append_row("sales", &ItemVector::from(vec![1, 1])).unwrap();
        for _ in 0..5 {
            store.append_row("sales", &ItemVector::from(vec![2; 6])).unwrap();
        }
        let orchestrator = Orchestrator::new(store, RestockConfig::default());

        let window = orchestrator.trailing_sales_window().unwrap();
        assert_eq!(window.line(0), Some(&[2, 2, 2, 2, 2][..]));
        assert_eq!(window.line(5), Some(&[2, 2, 2, 2, 2][..]));
    }

    #[test]
    fn malformed_sales_cell_reports_its_data_row() {
        let rows = cells(&[
            &["1", "1", "1", "1", "1", "1"],
            &["2", "2", "2", "2", "2", "2"],
            &["3", "3", "3", "oops", "3", "3"],
        ]);
        let orchestrator = Orchestrator::new(RawCells(vec![("sales", rows)]), RestockConfig::default());

        match orchestrator.trailing_sales_window().unwrap_err() {
            PipelineError::MalformedCell { row, column, cell, .. } => {
                assert_eq!((row, column), (2, 3));
                assert_eq!(cell, "oops");
            }
            other => panic!("expected MalformedCell, got {other:?}"),
        }
    }

    #[test]
    fn missing_worksheet_is_a_store_error() {
        let store = InMemoryWorksheetStore::new().with_worksheet("sales", header());
        let orchestrator = Orchestrator::new(store, RestockConfig::default());
        let mut input = ScriptedInput::new(["1,2,3,4,5,6"]);

        assert!(matches!(
            orchestrator.run(&mut input),
            Err(PipelineError::Store(StoreError::WorksheetNotFound(_)))
        ));
    }

    #[test]
    fn trailing_window_uses_only_the_newest_rows() {
        let store = store_with_stock(&[0; 6]);
        for day in 0..8 {
            store
                .append_row("sales", &ItemVector::from(vec![day; 6]))
                .unwrap();
        }
        let orchestrator = Orchestrator::new(store, RestockConfig::default());

        let window = orchestrator.trailing_sales_window().unwrap();
        assert_eq!(window.len(), 6);
        assert_eq!(window.line(0), Some(&[7, 6, 5, 4, 3][..]));
    }
}
