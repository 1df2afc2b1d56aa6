//! CLI configuration structs bridging CLI arguments to domain types.
//!
//! These structs decouple the CLI parsing layer from the business logic,
//! allowing command handlers to work with validated, typed configurations.

use chrono::NaiveDate;
use thiserror::Error;

use crate::scan::{ScanConfig, Sector};

/// Errors that can occur while turning CLI arguments into domain configs.
#[derive(Debug, Error)]
pub enum CliConfigError {
    #[error("invalid date '{0}': expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("invalid sector list '{0}': {1}")]
    InvalidSectors(String, String),

    #[error("cannot read config file '{0}': {1}")]
    ConfigRead(String, std::io::Error),

    #[error("cannot parse config file '{0}': {1}")]
    ConfigParse(String, serde_json::Error),
}

/// Where price series come from.
#[derive(Debug, Clone)]
pub enum DataSource {
    Csv { data_dir: String },
    Synthetic,
}

impl DataSource {
    pub fn from_flags(data_dir: &str, synthetic: bool) -> Self {
        if synthetic {
            DataSource::Synthetic
        } else {
            DataSource::Csv {
                data_dir: data_dir.to_string(),
            }
        }
    }
}

fn parse_date(s: &str) -> Result<NaiveDate, CliConfigError> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| CliConfigError::InvalidDate(s.to_string()))
}

/// Validated configuration for the single-pair backtest command.
#[derive(Debug, Clone)]
pub struct BacktestCliConfig {
    pub symbol_a: String,
    pub symbol_b: String,
    pub source: DataSource,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub confidence_level: u32,
    pub max_half_life_days: f64,
    pub leverage: f64,
    pub strict_out_of_sample: bool,
    pub output_dir: String,
}

impl BacktestCliConfig {
    #[allow(clippy::too_many_arguments)]
    pub fn from_args(
        symbol_a: &str,
        symbol_b: &str,
        data_dir: &str,
        synthetic: bool,
        start: &str,
        end: &str,
        confidence: u32,
        max_half_life: f64,
        leverage: f64,
        strict_out_of_sample: bool,
        output_dir: &str,
    ) -> Result<Self, CliConfigError> {
        Ok(Self {
            symbol_a: symbol_a.to_string(),
            symbol_b: symbol_b.to_string(),
            source: DataSource::from_flags(data_dir, synthetic),
            start_date: parse_date(start)?,
            end_date: parse_date(end)?,
            confidence_level: confidence,
            max_half_life_days: max_half_life,
            leverage,
            strict_out_of_sample,
            output_dir: output_dir.to_string(),
        })
    }
}

/// Validated configuration for the scan command.
#[derive(Debug, Clone)]
pub struct ScanCliConfig {
    pub scan: ScanConfig,
    pub source: DataSource,
    pub sequential: bool,
    pub output_dir: String,
}

impl ScanCliConfig {
    /// Build the scan configuration from an optional JSON file plus flag
    /// overrides. Flags win over file values; file values win over
    /// defaults.
    #[allow(clippy::too_many_arguments)]
    pub fn from_args(
        config_path: Option<&str>,
        sectors: &str,
        data_dir: &str,
        synthetic: bool,
        confidence: Option<u32>,
        max_half_life: Option<f64>,
        leverage: Option<f64>,
        start: Option<&str>,
        end: Option<&str>,
        strict_out_of_sample: bool,
        sequential: bool,
        output_dir: &str,
    ) -> Result<Self, CliConfigError> {
        let mut scan = match config_path {
            Some(path) => {
                let body = std::fs::read_to_string(path)
                    .map_err(|e| CliConfigError::ConfigRead(path.to_string(), e))?;
                serde_json::from_str(&body)
                    .map_err(|e| CliConfigError::ConfigParse(path.to_string(), e))?
            }
            None => ScanConfig::default(),
        };

        if sectors != "all" {
            scan.sectors = parse_sectors(sectors)?;
        }
        if let Some(confidence) = confidence {
            scan.confidence_level = confidence;
        }
        if let Some(max_half_life) = max_half_life {
            scan.max_half_life_days = max_half_life;
        }
        if let Some(leverage) = leverage {
            scan.leverage = leverage;
        }
        if let Some(start) = start {
            scan.start_date = parse_date(start)?;
        }
        if let Some(end) = end {
            scan.end_date = parse_date(end)?;
        }
        if strict_out_of_sample {
            scan.strict_out_of_sample = true;
        }

        Ok(Self {
            scan,
            source: DataSource::from_flags(data_dir, synthetic),
            sequential,
            output_dir: output_dir.to_string(),
        })
    }
}

fn parse_sectors(arg: &str) -> Result<Vec<Sector>, CliConfigError> {
    arg.split(',')
        .map(|s| {
            s.parse::<Sector>()
                .map_err(|e| CliConfigError::InvalidSectors(arg.to_string(), e))
        })
        .collect()
}
