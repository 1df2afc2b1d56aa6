//! Multi-pair scan driver.
//!
//! Enumerates every unordered symbol pair inside each configured sector
//! group and backtests both orientations (A over B and B over A: the
//! no-intercept hedge regression is not symmetric). Pair jobs are
//! independent — each owns its fetched series and its engine — so the
//! fan-out needs no synchronization beyond collecting results.

use rayon::prelude::*;
use tracing::{debug, error, info, warn};

use super::config::{ScanConfig, SectorGroup};
use super::ScanError;
use crate::backtest::{AlignedPriceSeries, BacktestConfig, BacktestReport, PairBacktest};
use crate::data::{align_pair, PriceSeriesProvider};

/// A qualified pair with its backtest result.
#[derive(Debug, Clone)]
pub struct PairFinding {
    pub sector: String,
    pub report: BacktestReport,
}

/// A pair rejected for a statistical reason (recoverable, expected).
#[derive(Debug, Clone)]
pub struct SkippedPair {
    pub sector: String,
    pub symbol_a: String,
    pub symbol_b: String,
    pub reason: String,
}

/// A pair that could not be evaluated because of a data problem.
///
/// Kept separate from [`SkippedPair`] so operators can tell "bad pair"
/// from "bad data" at a glance.
#[derive(Debug, Clone)]
pub struct DataFailure {
    pub sector: String,
    pub symbol_a: String,
    pub symbol_b: String,
    pub error: String,
}

/// Aggregated scan results.
#[derive(Debug, Default)]
pub struct ScanOutcome {
    pub findings: Vec<PairFinding>,
    pub skipped: Vec<SkippedPair>,
    pub data_failures: Vec<DataFailure>,
}

enum PairResult {
    Finding(PairFinding),
    Skipped(SkippedPair),
    DataFailure(DataFailure),
}

/// One unordered combination within a sector group.
struct PairJob {
    sector: String,
    symbol_a: String,
    symbol_b: String,
}

/// Run the full scan over the configured sector groups.
///
/// No per-pair error aborts the sweep: statistical rejections are tallied
/// and data failures reported separately. `sequential` forces serial
/// execution (useful for profiling and deterministic log order).
pub fn run_scan(
    provider: &dyn PriceSeriesProvider,
    config: &ScanConfig,
    sequential: bool,
) -> Result<ScanOutcome, ScanError> {
    config.validate().map_err(ScanError::InvalidConfig)?;
    let backtest_config = config
        .backtest_config()
        .map_err(|e| ScanError::InvalidConfig(e.to_string()))?;

    let groups = config.groups();
    let jobs = enumerate_jobs(&groups);
    info!(
        groups = groups.len(),
        combinations = jobs.len(),
        confidence = config.confidence_level,
        sequential,
        "Starting pair scan"
    );

    let evaluate = |job: &PairJob| evaluate_combination(provider, config, &backtest_config, job);

    let results: Vec<Vec<PairResult>> = if sequential {
        jobs.iter().map(evaluate).collect()
    } else {
        jobs.par_iter().map(evaluate).collect()
    };

    let mut outcome = ScanOutcome::default();
    for result in results.into_iter().flatten() {
        match result {
            PairResult::Finding(f) => outcome.findings.push(f),
            PairResult::Skipped(s) => outcome.skipped.push(s),
            PairResult::DataFailure(d) => outcome.data_failures.push(d),
        }
    }

    // Best results first in the report.
    outcome.findings.sort_by(|a, b| {
        b.report
            .cagr
            .partial_cmp(&a.report.cagr)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    info!(
        findings = outcome.findings.len(),
        skipped = outcome.skipped.len(),
        data_failures = outcome.data_failures.len(),
        "Scan complete"
    );

    Ok(outcome)
}

fn enumerate_jobs(groups: &[SectorGroup]) -> Vec<PairJob> {
    let mut jobs = Vec::new();
    for group in groups {
        for i in 0..group.symbols.len() {
            for j in (i + 1)..group.symbols.len() {
                jobs.push(PairJob {
                    sector: group.name.clone(),
                    symbol_a: group.symbols[i].clone(),
                    symbol_b: group.symbols[j].clone(),
                });
            }
        }
    }
    jobs
}

/// Evaluate one combination: fetch and align once, backtest both
/// orientations.
fn evaluate_combination(
    provider: &dyn PriceSeriesProvider,
    config: &ScanConfig,
    backtest_config: &BacktestConfig,
    job: &PairJob,
) -> Vec<PairResult> {
    let data_failure = |error: String| {
        error!(
            sector = %job.sector,
            pair = format!("{}-{}", job.symbol_a, job.symbol_b),
            error = %error,
            "Data failure, pair not evaluated"
        );
        vec![PairResult::DataFailure(DataFailure {
            sector: job.sector.clone(),
            symbol_a: job.symbol_a.clone(),
            symbol_b: job.symbol_b.clone(),
            error,
        })]
    };

    let series_a = match provider.fetch(&job.symbol_a, config.start_date, config.end_date) {
        Ok(series) => series,
        Err(e) => return data_failure(e.to_string()),
    };
    let series_b = match provider.fetch(&job.symbol_b, config.start_date, config.end_date) {
        Ok(series) => series,
        Err(e) => return data_failure(e.to_string()),
    };

    let Some(aligned) = align_pair(&series_a, &series_b) else {
        return data_failure(format!(
            "no overlapping dates between {} and {}",
            job.symbol_a, job.symbol_b
        ));
    };

    let swapped = AlignedPriceSeries::new(
        aligned.dates.clone(),
        aligned.close_b.clone(),
        aligned.close_a.clone(),
    );

    let orientations = [
        (&job.symbol_a, &job.symbol_b, aligned),
        (&job.symbol_b, &job.symbol_a, swapped),
    ];

    let mut results = Vec::with_capacity(2);
    for (sym_a, sym_b, series) in orientations {
        let mut backtest =
            PairBacktest::new(sym_a.clone(), sym_b.clone(), series, backtest_config.clone());
        match backtest.run() {
            Ok(report) => {
                info!(
                    sector = %job.sector,
                    pair = format!("{}-{}", sym_a, sym_b),
                    cagr = format!("{:.2}%", report.cagr * 100.0),
                    half_life = format!("{:.1}d", report.half_life_days),
                    "Viable pair found"
                );
                results.push(PairResult::Finding(PairFinding {
                    sector: job.sector.clone(),
                    report,
                }));
            }
            Err(e) if e.is_skippable() => {
                debug!(
                    sector = %job.sector,
                    pair = format!("{}-{}", sym_a, sym_b),
                    reason = %e,
                    "Pair does not qualify"
                );
                results.push(PairResult::Skipped(SkippedPair {
                    sector: job.sector.clone(),
                    symbol_a: sym_a.clone(),
                    symbol_b: sym_b.clone(),
                    reason: e.to_string(),
                }));
            }
            Err(e) => {
                // Only a configuration bug lands here; validate() should
                // have caught it before the fan-out.
                warn!(
                    sector = %job.sector,
                    pair = format!("{}-{}", sym_a, sym_b),
                    error = %e,
                    "Non-recoverable backtest error"
                );
                results.push(PairResult::Skipped(SkippedPair {
                    sector: job.sector.clone(),
                    symbol_a: sym_a.clone(),
                    symbol_b: sym_b.clone(),
                    reason: e.to_string(),
                }));
            }
        }
    }
    results
}
