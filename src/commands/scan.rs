//! Scan command handler.
//!
//! Implements the `scan` subcommand: sweep the configured sector universes
//! for cointegrated pairs, backtest every candidate in both directions, and
//! render the report artifacts.

use tracing::{info, warn};

use crate::cli::ScanCliConfig;
use crate::scan::{run_scan, write_report};

use super::make_provider;

/// Run the sector scan pipeline with the provided CLI configuration.
pub fn run_scan_command(config: ScanCliConfig) -> Result<(), Box<dyn std::error::Error>> {
    info!("--- pairscan: Sector Pair Scan ---");

    config
        .scan
        .validate()
        .map_err(|e| format!("invalid configuration: {e}"))?;

    let provider = make_provider(&config.source);
    let outcome = run_scan(provider.as_ref(), &config.scan, config.sequential)?;

    if outcome.findings.is_empty() {
        warn!("No pairs qualified; see the report for rejection details");
    } else {
        println!(
            "\n{:<16} | {:<14} | {:>8} | {:>8} | {:>7} | {:>7} | {:>9}",
            "Pair", "Sector", "CAGR", "MaxDD", "Win", "Vol", "Half-Life"
        );
        println!("{}", "-".repeat(85));
        for finding in &outcome.findings {
            let report = &finding.report;
            println!(
                "{:<16} | {:<14} | {:>7.2}% | {:>7.2}% | {:>6.2}% | {:>6.2}% | {:>8.1}d",
                format!("{}/{}", report.symbol_a, report.symbol_b),
                finding.sector,
                report.cagr * 100.0,
                report.max_drawdown * 100.0,
                report.win_ratio * 100.0,
                report.annualized_volatility * 100.0,
                report.half_life_days,
            );
        }
    }

    if !outcome.data_failures.is_empty() {
        warn!(
            failures = outcome.data_failures.len(),
            "Some pairs had data problems; they are listed separately in the report"
        );
    }

    write_report(&outcome, &config.scan, config.output_dir.as_ref())?;

    println!(
        "\n✓ {} finding(s) written to {}",
        outcome.findings.len(),
        config.output_dir
    );

    Ok(())
}
