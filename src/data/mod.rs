//! Historical price retrieval boundary.
//!
//! The backtest core never performs I/O; it consumes an [`AlignedPriceSeries`]
//! built from two provider fetches. Providers are swappable behind the
//! [`PriceSeriesProvider`] trait so the scan driver can run against CSV files,
//! synthetic data, or a mock in tests.

mod align;
mod csv;
mod synthetic;

pub use align::align_pair;
pub use csv::CsvPriceProvider;
pub use synthetic::SyntheticPriceProvider;

use chrono::NaiveDate;
use thiserror::Error;

/// A single symbol's date-indexed close series.
#[derive(Debug, Clone)]
pub struct PriceSeries {
    pub symbol: String,
    pub dates: Vec<NaiveDate>,
    pub closes: Vec<f64>,
}

impl PriceSeries {
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

/// Errors from the price-retrieval boundary.
///
/// `NoDataAvailable` is a hard failure for the affected pair: it signals a
/// data problem, not a statistical non-result, and is reported distinctly
/// from backtest skips.
#[derive(Error, Debug)]
pub enum DataError {
    /// Upstream returned nothing for the symbol over the requested range.
    #[error("no data available for {symbol} between {start} and {end}")]
    NoDataAvailable {
        symbol: String,
        start: NaiveDate,
        end: NaiveDate,
    },

    /// The source exists but could not be parsed into a price series.
    #[error("malformed price data for {symbol}: {reason}")]
    Malformed { symbol: String, reason: String },

    /// I/O error reading the source.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Supplies a date-indexed close series for one symbol over a date range.
pub trait PriceSeriesProvider: Send + Sync {
    fn fetch(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries, DataError>;
}
