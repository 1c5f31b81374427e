//! Command-line surface: argument parsing and the two operator commands.

use std::io::Write;

use anyhow::Context;
use clap::{Parser, Subcommand};

use restock_core::ItemVector;
use restock_infra::{Orchestrator, RestockConfig, RunReport, SalesInput, WorksheetStore};
use restock_sales::parse_sales_line;

/// Record today's sales, the surplus against current stock, and next stock.
///
/// Settings come from `RESTOCK_*` environment variables.
#[derive(Debug, Parser)]
#[command(name = "restock", version)]
pub struct Cli {
    /// Print the run report as JSON instead of a table.
    #[arg(long)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Append an initial stock row, e.g. 40,40,40,40,40,40.
    SeedStock {
        /// Comma-separated stock counts, one per product line.
        #[arg(allow_hyphen_values = true)]
        row: String,
    },
}

/// Run the pipeline once and print the outcome.
pub fn run<S, I, W>(
    orchestrator: &Orchestrator<S>,
    input: &mut I,
    out: &mut W,
    json: bool,
) -> anyhow::Result<RunReport>
where
    S: WorksheetStore,
    I: SalesInput,
    W: Write,
{
    let report = orchestrator.run(input).context("pipeline run failed")?;

    if json {
        serde_json::to_writer_pretty(&mut *out, &report)?;
        writeln!(out)?;
    } else {
        out.write_all(render_report(&report, &orchestrator.config().product_lines).as_bytes())?;
    }
    Ok(report)
}

/// Validate `row` like a sales line and append it to the stock worksheet.
pub fn seed_stock<S>(store: &S, config: &RestockConfig, row: &str) -> anyhow::Result<ItemVector>
where
    S: WorksheetStore,
{
    let stock = parse_sales_line(row, config.product_line_count())
        .with_context(|| format!("invalid stock row {row:?}"))?;
    store
        .append_row(&config.worksheets.stock, &stock)
        .context("failed to append stock row")?;
    tracing::info!(worksheet = %config.worksheets.stock, row = %stock, "stock seeded");
    Ok(stock)
}

/// Operator-facing summary: one line per product line.
pub fn render_report(report: &RunReport, product_lines: &[String]) -> String {
    let width = product_lines.iter().map(String::len).max().unwrap_or(0);
    let mut text = String::from("\nProduct line   sold  surplus  next stock\n");
    for (i, name) in product_lines.iter().enumerate() {
        let cell = |v: &ItemVector| v.get(i).map(|n| n.to_string()).unwrap_or_default();
        text.push_str(&format!(
            "{name:<width$}  {:>6}  {:>7}  {:>10}\n",
            cell(&report.sales),
            cell(&report.surplus),
            cell(&report.forecast),
        ));
    }
    text
}
