//! Backtest command handler.
//!
//! Implements the `backtest` subcommand: run the full pipeline for one
//! symbol pair and write the metrics plus the annotated series to disk.

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use serde::Serialize;
use tracing::{info, warn};

use crate::backtest::{BacktestConfig, ConfidenceLevel, PairBacktest};
use crate::cli::BacktestCliConfig;
use crate::data::align_pair;
use crate::scan::write_annotated_csv;

use super::make_provider;

/// Backtest results in JSON-serializable format.
#[derive(Debug, Serialize)]
struct BacktestOutput {
    symbol_a: String,
    symbol_b: String,
    start_date: String,
    end_date: String,
    hedge_ratio: f64,
    half_life_days: f64,
    cagr_pct: f64,
    annualized_volatility_pct: f64,
    win_ratio_pct: f64,
    max_drawdown_pct: f64,
}

/// Run a single-pair backtest with the provided CLI configuration.
///
/// A pair that fails to qualify statistically (not cointegrated, too little
/// data, unusable half-life) is reported and the command exits cleanly; only
/// configuration and I/O problems surface as errors.
pub fn run_backtest(config: BacktestCliConfig) -> Result<(), Box<dyn std::error::Error>> {
    info!(
        pair = format!("{}-{}", config.symbol_a, config.symbol_b),
        start = %config.start_date,
        end = %config.end_date,
        confidence = config.confidence_level,
        "--- Running Pair Backtest ---"
    );

    let backtest_config = BacktestConfig {
        confidence_level: ConfidenceLevel::try_from(config.confidence_level)?,
        max_half_life_days: config.max_half_life_days,
        leverage: config.leverage,
        strict_out_of_sample: config.strict_out_of_sample,
    };

    let provider = make_provider(&config.source);
    let series_a = provider.fetch(&config.symbol_a, config.start_date, config.end_date)?;
    let series_b = provider.fetch(&config.symbol_b, config.start_date, config.end_date)?;

    let aligned = align_pair(&series_a, &series_b).ok_or_else(|| {
        format!(
            "no overlapping dates between {} and {}",
            config.symbol_a, config.symbol_b
        )
    })?;
    info!(rows = aligned.len(), "Series aligned");

    let mut backtest = PairBacktest::new(
        config.symbol_a.clone(),
        config.symbol_b.clone(),
        aligned,
        backtest_config,
    );

    let report = match backtest.run() {
        Ok(report) => report,
        Err(e) if e.is_skippable() => {
            warn!(
                pair = format!("{}-{}", config.symbol_a, config.symbol_b),
                reason = %e,
                "Pair does not qualify for the strategy"
            );
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    info!("--- Backtest Results ---");
    info!("Pair:            {} & {}", report.symbol_a, report.symbol_b);
    info!(
        "Equation:        {} - {:.4} x {}",
        report.symbol_a, report.hedge_ratio, report.symbol_b
    );
    info!("Half-Life:       {:.1} days", report.half_life_days);
    info!("CAGR:            {:.2}%", report.cagr * 100.0);
    info!("Max Drawdown:    {:.2}%", report.max_drawdown * 100.0);
    info!("Win Ratio:       {:.2}%", report.win_ratio * 100.0);
    info!(
        "Std Deviation:   {:.2}%",
        report.annualized_volatility * 100.0
    );
    info!("------------------------");

    let output = BacktestOutput {
        symbol_a: report.symbol_a.clone(),
        symbol_b: report.symbol_b.clone(),
        start_date: config.start_date.to_string(),
        end_date: config.end_date.to_string(),
        hedge_ratio: report.hedge_ratio,
        half_life_days: report.half_life_days,
        cagr_pct: report.cagr * 100.0,
        annualized_volatility_pct: report.annualized_volatility * 100.0,
        win_ratio_pct: report.win_ratio * 100.0,
        max_drawdown_pct: report.max_drawdown * 100.0,
    };

    fs::create_dir_all(&config.output_dir)?;
    let results_path = Path::new(&config.output_dir).join("results.json");
    let mut file = File::create(&results_path)?;
    let json = serde_json::to_string_pretty(&output)?;
    file.write_all(json.as_bytes())?;
    info!(path = %results_path.display(), "Results written");

    let annotated_path = Path::new(&config.output_dir).join(format!(
        "{}_{}_annotated.csv",
        report.symbol_a, report.symbol_b
    ));
    write_annotated_csv(&report.annotated, &annotated_path)?;
    info!(path = %annotated_path.display(), "Annotated series written");

    Ok(())
}
