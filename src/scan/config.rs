//! Configuration for the sector scan pipeline.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::sector::Sector;
use crate::backtest::{BacktestConfig, BacktestError, ConfidenceLevel};

/// A named group of symbols that are paired with each other.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectorGroup {
    pub name: String,
    pub symbols: Vec<String>,
}

/// Configuration for a multi-pair sector scan.
///
/// Loadable from JSON; every field has a default (90% confidence, 60-day
/// half-life ceiling, unlevered, 2012 through 2020).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Sectors to scan; all five by default.
    #[serde(default = "default_sectors")]
    pub sectors: Vec<Sector>,

    /// Custom sector groups. When non-empty these replace the built-in
    /// universe entirely and `sectors` is ignored.
    #[serde(default)]
    pub custom_universe: Vec<SectorGroup>,

    /// Cointegration confidence level: 90, 95 or 99.
    #[serde(default = "default_confidence_level")]
    pub confidence_level: u32,

    /// Maximum acceptable mean-reversion half-life in days.
    #[serde(default = "default_max_half_life")]
    pub max_half_life_days: f64,

    /// Leverage multiplier applied to per-period returns.
    #[serde(default = "default_leverage")]
    pub leverage: f64,

    /// Backtest range start (inclusive).
    #[serde(default = "default_start_date")]
    pub start_date: NaiveDate,

    /// Backtest range end (inclusive).
    #[serde(default = "default_end_date")]
    pub end_date: NaiveDate,

    /// Run the stationarity test on the in-sample prefix only.
    #[serde(default)]
    pub strict_out_of_sample: bool,
}

fn default_sectors() -> Vec<Sector> {
    Sector::ALL.to_vec()
}
fn default_confidence_level() -> u32 {
    90
}
fn default_max_half_life() -> f64 {
    60.0
}
fn default_leverage() -> f64 {
    1.0
}
fn default_start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2012, 1, 1).expect("valid default start date")
}
fn default_end_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2020, 12, 31).expect("valid default end date")
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            sectors: default_sectors(),
            custom_universe: Vec::new(),
            confidence_level: default_confidence_level(),
            max_half_life_days: default_max_half_life(),
            leverage: default_leverage(),
            start_date: default_start_date(),
            end_date: default_end_date(),
            strict_out_of_sample: false,
        }
    }
}

impl ScanConfig {
    /// The sector groups this scan will sweep: the custom universe when one
    /// is configured, otherwise the built-in tables for the selected
    /// sectors.
    pub fn groups(&self) -> Vec<SectorGroup> {
        if !self.custom_universe.is_empty() {
            return self.custom_universe.clone();
        }
        self.sectors
            .iter()
            .map(|sector| SectorGroup {
                name: sector.to_string(),
                symbols: sector.symbols().iter().map(|s| s.to_string()).collect(),
            })
            .collect()
    }

    /// Validate configuration before starting a scan.
    pub fn validate(&self) -> Result<(), String> {
        if self.sectors.is_empty() && self.custom_universe.is_empty() {
            return Err("sectors list cannot be empty".to_string());
        }
        for group in &self.custom_universe {
            if group.name.trim().is_empty() {
                return Err("custom universe group has an empty name".to_string());
            }
            if group.symbols.len() < 2 {
                return Err(format!(
                    "group '{}' needs at least 2 symbols to form pairs",
                    group.name
                ));
            }
        }
        ConfidenceLevel::try_from(self.confidence_level)
            .map_err(|e| e.to_string())?;
        if self.max_half_life_days <= 0.0 {
            return Err(format!(
                "max_half_life_days must be positive, got {}",
                self.max_half_life_days
            ));
        }
        if self.leverage <= 0.0 {
            return Err(format!("leverage must be positive, got {}", self.leverage));
        }
        if self.end_date <= self.start_date {
            return Err(format!(
                "end_date {} must be after start_date {}",
                self.end_date, self.start_date
            ));
        }
        Ok(())
    }

    /// Per-pair backtest configuration derived from the scan settings.
    pub fn backtest_config(&self) -> Result<BacktestConfig, BacktestError> {
        Ok(BacktestConfig {
            confidence_level: ConfidenceLevel::try_from(self.confidence_level)?,
            max_half_life_days: self.max_half_life_days,
            leverage: self.leverage,
            strict_out_of_sample: self.strict_out_of_sample,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ScanConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.confidence_level, 90);
        assert_eq!(config.max_half_life_days, 60.0);
    }

    #[test]
    fn test_bad_confidence_level_invalid() {
        let config = ScanConfig {
            confidence_level: 85,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_inverted_date_range_invalid() {
        let config = ScanConfig {
            start_date: default_end_date(),
            end_date: default_start_date(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_deserializes_with_defaults() {
        let config: ScanConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.sectors.len(), 5);
        assert_eq!(config.leverage, 1.0);
        assert!(!config.strict_out_of_sample);
    }

    #[test]
    fn test_partial_json_overrides() {
        let config: ScanConfig =
            serde_json::from_str(r#"{"confidence_level": 99, "leverage": 2.0}"#).unwrap();
        assert_eq!(config.confidence_level, 99);
        assert_eq!(config.leverage, 2.0);
        assert_eq!(config.max_half_life_days, 60.0);
    }

    #[test]
    fn test_custom_universe_replaces_builtin_groups() {
        let config: ScanConfig = serde_json::from_str(
            r#"{"custom_universe": [{"name": "Megacaps", "symbols": ["AAPL", "MSFT", "GOOGL"]}]}"#,
        )
        .unwrap();
        assert!(config.validate().is_ok());

        let groups = config.groups();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].name, "Megacaps");
        assert_eq!(groups[0].symbols.len(), 3);
    }

    #[test]
    fn test_undersized_custom_group_invalid() {
        let config = ScanConfig {
            custom_universe: vec![SectorGroup {
                name: "Solo".to_string(),
                symbols: vec!["AAPL".to_string()],
            }],
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_default_groups_cover_selected_sectors() {
        let config = ScanConfig::default();
        let groups = config.groups();
        assert_eq!(groups.len(), 5);
        assert!(groups.iter().all(|g| g.symbols.len() == 15));
    }
}
