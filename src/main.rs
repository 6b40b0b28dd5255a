//! Smartcart command line
//!
//! Loads a price catalog, optimises the shopping list across stores and
//! prints the result tiers as tables or as the JSON result document.

use std::{
    fs,
    io::{self, Write},
    path::PathBuf,
    process::ExitCode,
    time::Instant,
};

use humanize_duration::{Truncate, prelude::DurationExt};
use thiserror::Error;
use tracing::{error, info};

use smartcart::{
    config::{Config, OutputFormat},
    logging::{self, LoggingError},
    optimizer::optimize,
    prices::{PriceError, currency_from_code},
    report::ReportError,
    shopping_list::{ShoppingList, ShoppingListError},
    sources::{CatalogFile, PriceSource, SourceError},
};

/// Failures surfaced by the command line.
#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Logging(#[from] LoggingError),

    #[error(transparent)]
    Currency(#[from] PriceError),

    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Report(#[from] ReportError),

    #[error(transparent)]
    ShoppingList(#[from] ShoppingListError),

    #[error("failed to read cart {path}: {source}")]
    Cart { path: PathBuf, source: io::Error },

    #[error("failed to write output: {0}")]
    Io(#[from] io::Error),
}

fn main() -> ExitCode {
    let config = match Config::load() {
        Ok(config) => config,
        Err(err) => {
            // clap renders help/version and usage errors itself
            _ = err.print();

            return if err.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    if let Err(err) = logging::init(&config.logging) {
        #[expect(
            clippy::print_stderr,
            reason = "logging not initialized, must use eprintln for setup errors"
        )]
        {
            eprintln!("Logging error: {err}");
        }

        return ExitCode::FAILURE;
    }

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");

            ExitCode::FAILURE
        }
    }
}

/// Shopping list from `--cart`, `--list`, or empty to price the whole catalog.
fn shopping_list(config: &Config) -> Result<ShoppingList, CliError> {
    if let Some(path) = &config.cart {
        let contents = fs::read_to_string(path).map_err(|source| CliError::Cart {
            path: path.clone(),
            source,
        })?;

        return Ok(ShoppingList::from_json_str(&contents)?);
    }

    Ok(config
        .list
        .as_deref()
        .map(ShoppingList::parse)
        .unwrap_or_default())
}

fn run(config: &Config) -> Result<(), CliError> {
    let currency = currency_from_code(&config.currency)?;

    let list = shopping_list(config)?;

    let source = CatalogFile::new(&config.catalog, currency).with_max_stores(config.max_stores);
    let catalog = source.fetch_catalog(&list, &config.dietary_filter())?;

    let start = Instant::now();
    let report = optimize(&catalog);
    let elapsed = start.elapsed();

    info!(elapsed = %elapsed.human(Truncate::Nano), "optimised cart");

    let stdout = io::stdout();
    let mut handle = stdout.lock();

    match config.output {
        OutputFormat::Json => report.write_json(&mut handle)?,
        OutputFormat::Table => {
            report.write_to(&mut handle)?;

            writeln!(
                handle,
                " {} ({}s)",
                elapsed.human(Truncate::Nano),
                elapsed.as_secs_f32()
            )?;
        }
    }

    Ok(())
}
