//! CLI argument parsing using clap.
//!
//! This module defines the command-line interface for pairscan,
//! including all subcommands and their arguments.

mod config;

pub use config::{BacktestCliConfig, CliConfigError, DataSource, ScanCliConfig};

use clap::{Parser, Subcommand};

/// pairscan - Statistical Pairs-Trading Backtester
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Set the verbosity level (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "info")]
    pub verbose: String,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Backtest a single pair of symbols
    Backtest {
        /// First leg symbol (e.g., "JPM")
        #[arg(long)]
        symbol_a: String,
        /// Second leg symbol (e.g., "BAC")
        #[arg(long)]
        symbol_b: String,
        /// Directory of per-symbol CSV files (date,close)
        #[arg(long, default_value = "data")]
        data_dir: String,
        /// Use synthetic data instead of CSV files (for CI)
        #[arg(long, default_value_t = false)]
        synthetic: bool,
        /// Backtest range start (YYYY-MM-DD)
        #[arg(long, default_value = "2012-01-01")]
        start: String,
        /// Backtest range end (YYYY-MM-DD)
        #[arg(long, default_value = "2020-12-31")]
        end: String,
        /// Cointegration confidence level: 90, 95 or 99
        #[arg(long, default_value_t = 90)]
        confidence: u32,
        /// Maximum acceptable half-life in days
        #[arg(long, default_value_t = 60.0)]
        max_half_life: f64,
        /// Leverage multiplier applied to per-period returns
        #[arg(long, default_value_t = 1.0)]
        leverage: f64,
        /// Run the stationarity test on the in-sample prefix only
        #[arg(long, default_value_t = false)]
        strict_out_of_sample: bool,
        /// Output directory for results
        #[arg(long, default_value = "backtest_results")]
        output_dir: String,
    },

    /// Scan sector universes for cointegrated pairs and render a report
    Scan {
        /// Path to a ScanConfig JSON file; flags override its values
        #[arg(long)]
        config: Option<String>,
        /// Sectors to scan (comma-separated, or "all")
        #[arg(long, default_value = "all")]
        sectors: String,
        /// Directory of per-symbol CSV files (date,close)
        #[arg(long, default_value = "data")]
        data_dir: String,
        /// Use synthetic data instead of CSV files (for CI)
        #[arg(long, default_value_t = false)]
        synthetic: bool,
        /// Cointegration confidence level: 90, 95 or 99
        #[arg(long)]
        confidence: Option<u32>,
        /// Maximum acceptable half-life in days
        #[arg(long)]
        max_half_life: Option<f64>,
        /// Leverage multiplier applied to per-period returns
        #[arg(long)]
        leverage: Option<f64>,
        /// Backtest range start (YYYY-MM-DD)
        #[arg(long)]
        start: Option<String>,
        /// Backtest range end (YYYY-MM-DD)
        #[arg(long)]
        end: Option<String>,
        /// Run the stationarity test on the in-sample prefix only
        #[arg(long, default_value_t = false)]
        strict_out_of_sample: bool,
        /// Evaluate pairs serially instead of across worker threads
        #[arg(long, default_value_t = false)]
        sequential: bool,
        /// Output directory for the report artifacts
        #[arg(long, default_value = "report")]
        output_dir: String,
    },
}
