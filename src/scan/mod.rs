//! Sector scan orchestration.
//!
//! Enumerates candidate pairs inside sector groups, fans the backtests out
//! across worker threads, and renders the findings into report artifacts.
//!
//! # Example
//!
//! ```ignore
//! use pairscan::data::CsvPriceProvider;
//! use pairscan::scan::{run_scan, write_report, ScanConfig};
//!
//! let provider = CsvPriceProvider::new("data");
//! let config = ScanConfig::default();
//! let outcome = run_scan(&provider, &config, false)?;
//! write_report(&outcome, &config, "report".as_ref())?;
//! ```

pub mod config;
pub mod report;
pub mod runner;
pub mod sector;

pub use config::{ScanConfig, SectorGroup};
pub use report::{write_annotated_csv, write_curve_csv, write_report};
pub use runner::{run_scan, DataFailure, PairFinding, ScanOutcome, SkippedPair};
pub use sector::Sector;

use thiserror::Error;

/// Errors from the scan pipeline itself (not per-pair results).
#[derive(Error, Debug)]
pub enum ScanError {
    /// Invalid configuration.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// I/O error writing report artifacts.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
