//! CSV-backed price provider.
//!
//! Reads `{data_dir}/{symbol}.csv` with `date` (YYYY-MM-DD) and `close`
//! columns. This is the offline stand-in for a market-data vendor: the scan
//! driver only sees the [`PriceSeriesProvider`] trait.

use std::fs::File;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use polars::prelude::*;
use tracing::info;

use super::{DataError, PriceSeries, PriceSeriesProvider};

pub struct CsvPriceProvider {
    data_dir: PathBuf,
}

impl CsvPriceProvider {
    pub fn new<P: Into<PathBuf>>(data_dir: P) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Candidate file paths for a symbol, checked in order.
    fn candidate_paths(&self, symbol: &str) -> [PathBuf; 2] {
        [
            self.data_dir.join(format!("{}.csv", symbol)),
            self.data_dir.join(format!("{}.csv", symbol.to_lowercase())),
        ]
    }

    fn read_frame(path: &Path, symbol: &str) -> Result<DataFrame, DataError> {
        let file = File::open(path)?;
        CsvReader::new(file)
            .finish()
            .map_err(|e| DataError::Malformed {
                symbol: symbol.to_string(),
                reason: e.to_string(),
            })
    }
}

impl PriceSeriesProvider for CsvPriceProvider {
    fn fetch(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries, DataError> {
        let path = self
            .candidate_paths(symbol)
            .into_iter()
            .find(|p| p.exists())
            .ok_or_else(|| DataError::NoDataAvailable {
                symbol: symbol.to_string(),
                start,
                end,
            })?;

        info!(symbol = %symbol, path = %path.display(), "Loading CSV price data");
        let df = Self::read_frame(&path, symbol)?;

        let malformed = |reason: String| DataError::Malformed {
            symbol: symbol.to_string(),
            reason,
        };

        let date_col = df
            .column("date")
            .and_then(|c| c.str())
            .map_err(|e| malformed(e.to_string()))?
            .clone();
        let close_col = df
            .column("close")
            .and_then(|c| c.cast(&DataType::Float64))
            .map_err(|e| malformed(e.to_string()))?;
        let close_col = close_col.f64().map_err(|e| malformed(e.to_string()))?.clone();

        let mut rows: Vec<(NaiveDate, f64)> = Vec::with_capacity(df.height());
        for (date_str, close) in date_col.into_iter().zip(close_col.into_iter()) {
            let (Some(date_str), Some(close)) = (date_str, close) else {
                continue;
            };
            let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
                .map_err(|e| malformed(format!("bad date '{}': {}", date_str, e)))?;
            if date >= start && date <= end {
                rows.push((date, close));
            }
        }

        if rows.is_empty() {
            return Err(DataError::NoDataAvailable {
                symbol: symbol.to_string(),
                start,
                end,
            });
        }

        rows.sort_by_key(|(d, _)| *d);
        // Duplicate dates would violate the aligner's ordering contract.
        rows.dedup_by_key(|(d, _)| *d);

        Ok(PriceSeries {
            symbol: symbol.to_string(),
            dates: rows.iter().map(|(d, _)| *d).collect(),
            closes: rows.iter().map(|(_, c)| *c).collect(),
        })
    }
}
