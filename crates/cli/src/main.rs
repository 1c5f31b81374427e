use std::io;

use anyhow::Context;
use clap::Parser;

use restock_cli::commands::{self, Cli, Command};
use restock_cli::prompt::TerminalInput;
use restock_infra::{JsonFileWorksheetStore, Orchestrator, RestockConfig};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    restock_observability::init();

    let config = RestockConfig::from_env().context("invalid configuration")?;
    tracing::info!(
        store = %config.store_path.display(),
        product_lines = config.product_line_count(),
        window = config.window,
        uplift = %config.uplift,
        "starting restock"
    );

    let store = JsonFileWorksheetStore::open(&config.store_path);
    for name in config.worksheets.all() {
        store
            .ensure_worksheet(name, config.product_lines.clone())
            .with_context(|| format!("failed to prepare worksheet {name:?}"))?;
    }

    match cli.command {
        Some(Command::SeedStock { row }) => {
            let stock = commands::seed_stock(&store, &config, &row)?;
            println!("Stock row {stock} recorded.");
        }
        None => {
            println!("Welcome to Restock data automation");
            let stdin = io::stdin();
            let mut input = TerminalInput::new(stdin.lock(), io::stdout(), config.product_lines.clone());
            let orchestrator = Orchestrator::new(store, config);
            commands::run(&orchestrator, &mut input, &mut io::stdout(), cli.json)?;
        }
    }

    Ok(())
}
