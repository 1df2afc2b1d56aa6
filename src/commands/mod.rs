//! CLI command handlers.
//!
//! This module contains the implementation for each CLI subcommand,
//! delegating to the backtest engine and the scan pipeline.

mod backtest;
mod scan;

pub use backtest::run_backtest;
pub use scan::run_scan_command;

use crate::cli::DataSource;
use crate::data::{CsvPriceProvider, PriceSeriesProvider, SyntheticPriceProvider};

/// Build the provider selected by the CLI.
pub(crate) fn make_provider(source: &DataSource) -> Box<dyn PriceSeriesProvider> {
    match source {
        DataSource::Csv { data_dir } => Box::new(CsvPriceProvider::new(data_dir.clone())),
        DataSource::Synthetic => Box::new(SyntheticPriceProvider::new()),
    }
}
