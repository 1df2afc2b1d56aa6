//! Scan report rendering.
//!
//! Emits three artifacts into the output directory: a human-readable
//! `report.md` grouped by sector, a machine-readable `results.json`, and one
//! cumulative-return CSV per finding under `curves/`. Layout and pagination
//! beyond simple Markdown are deliberately out of scope.

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use serde::Serialize;
use tracing::info;

use super::config::ScanConfig;
use super::runner::{PairFinding, ScanOutcome};
use super::ScanError;
use crate::backtest::AnnotatedSeries;

/// Glyphs for the cumulative-return sparkline, lowest to highest.
const SPARK_LEVELS: [char; 8] = ['\u{2581}', '\u{2582}', '\u{2583}', '\u{2584}', '\u{2585}', '\u{2586}', '\u{2587}', '\u{2588}'];

/// Sparkline width in characters.
const SPARK_WIDTH: usize = 60;

/// Flattened finding for JSON output.
#[derive(Debug, Serialize)]
struct FindingRecord {
    sector: String,
    symbol_a: String,
    symbol_b: String,
    hedge_ratio: f64,
    half_life_days: f64,
    cagr: f64,
    annualized_volatility: f64,
    win_ratio: f64,
    max_drawdown: f64,
    final_cum_return: Option<f64>,
}

#[derive(Debug, Serialize)]
struct FailureRecord {
    sector: String,
    symbol_a: String,
    symbol_b: String,
    error: String,
}

#[derive(Debug, Serialize)]
struct ResultsDocument {
    confidence_level: u32,
    start_date: String,
    end_date: String,
    findings: Vec<FindingRecord>,
    skipped_pairs: usize,
    data_failures: Vec<FailureRecord>,
}

/// Write all report artifacts for a completed scan.
pub fn write_report(
    outcome: &ScanOutcome,
    config: &ScanConfig,
    output_dir: &Path,
) -> Result<(), ScanError> {
    fs::create_dir_all(output_dir)?;
    let curves_dir = output_dir.join("curves");
    fs::create_dir_all(&curves_dir)?;

    let markdown = render_markdown(outcome, config);
    fs::write(output_dir.join("report.md"), markdown)?;

    let document = ResultsDocument {
        confidence_level: config.confidence_level,
        start_date: config.start_date.to_string(),
        end_date: config.end_date.to_string(),
        findings: outcome.findings.iter().map(finding_record).collect(),
        skipped_pairs: outcome.skipped.len(),
        data_failures: outcome
            .data_failures
            .iter()
            .map(|f| FailureRecord {
                sector: f.sector.clone(),
                symbol_a: f.symbol_a.clone(),
                symbol_b: f.symbol_b.clone(),
                error: f.error.clone(),
            })
            .collect(),
    };
    let json = serde_json::to_string_pretty(&document)?;
    fs::write(output_dir.join("results.json"), json)?;

    for finding in &outcome.findings {
        let path = curves_dir.join(format!(
            "{}_{}.csv",
            finding.report.symbol_a, finding.report.symbol_b
        ));
        write_curve_csv(&finding.report.annotated, &path)?;
    }

    info!(
        dir = %output_dir.display(),
        findings = outcome.findings.len(),
        "Report written"
    );
    Ok(())
}

fn finding_record(finding: &PairFinding) -> FindingRecord {
    let report = &finding.report;
    FindingRecord {
        sector: finding.sector.clone(),
        symbol_a: report.symbol_a.clone(),
        symbol_b: report.symbol_b.clone(),
        hedge_ratio: report.hedge_ratio,
        half_life_days: report.half_life_days,
        cagr: report.cagr,
        annualized_volatility: report.annualized_volatility,
        win_ratio: report.win_ratio,
        max_drawdown: report.max_drawdown,
        final_cum_return: report.annotated.cum_returns.iter().rev().find_map(|c| *c),
    }
}

fn render_markdown(outcome: &ScanOutcome, config: &ScanConfig) -> String {
    let mut out = String::new();
    out.push_str("# Stock Pairs Trading Report\n\n");
    out.push_str(&format!(
        "Backtest range {} to {}, cointegration confidence {}%, leverage {:.1}x.\n\n",
        config.start_date, config.end_date, config.confidence_level, config.leverage
    ));

    if outcome.findings.is_empty() {
        out.push_str("No qualifying pairs found.\n\n");
    }

    for group in config.groups() {
        let findings: Vec<&PairFinding> = outcome
            .findings
            .iter()
            .filter(|f| f.sector == group.name)
            .collect();
        if findings.is_empty() {
            continue;
        }

        out.push_str(&format!("## {}\n\n", group.name));
        for finding in findings {
            let report = &finding.report;
            out.push_str(&format!(
                "### {} & {}\n\n",
                report.symbol_a, report.symbol_b
            ));
            out.push_str(&format!("- CAGR: {:.2}%\n", report.cagr * 100.0));
            out.push_str(&format!(
                "- Max Drawdown: {:.2}%\n",
                report.max_drawdown * 100.0
            ));
            out.push_str(&format!("- Win Ratio: {:.2}%\n", report.win_ratio * 100.0));
            out.push_str(&format!(
                "- Std Deviation: {:.2}%\n",
                report.annualized_volatility * 100.0
            ));
            out.push_str(&format!(
                "- Half-Life: {:.1} days\n",
                report.half_life_days
            ));
            out.push_str(&format!(
                "- Equation: {} - {:.4} \u{00d7} {}\n\n",
                report.symbol_a, report.hedge_ratio, report.symbol_b
            ));

            let curve: Vec<f64> = report.annotated.cum_returns.iter().filter_map(|c| *c).collect();
            if !curve.is_empty() {
                out.push_str("Cumulative returns:\n\n```\n");
                out.push_str(&sparkline(&curve, SPARK_WIDTH));
                out.push_str("\n```\n\n");
            }
        }
    }

    if !outcome.data_failures.is_empty() {
        out.push_str("## Data failures\n\n");
        out.push_str(
            "These pairs were not evaluated because price data was missing \
             or unusable (distinct from statistical rejections):\n\n",
        );
        for failure in &outcome.data_failures {
            out.push_str(&format!(
                "- {} / {} ({}): {}\n",
                failure.symbol_a, failure.symbol_b, failure.sector, failure.error
            ));
        }
        out.push('\n');
    }

    out.push_str(&format!(
        "---\n\n{} qualifying pair(s), {} statistical rejection(s), {} data failure(s).\n",
        outcome.findings.len(),
        outcome.skipped.len(),
        outcome.data_failures.len()
    ));

    out
}

/// Downsample a series into a fixed-width unicode sparkline.
fn sparkline(values: &[f64], width: usize) -> String {
    if values.is_empty() || width == 0 {
        return String::new();
    }

    let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;

    let buckets = width.min(values.len());
    let mut out = String::with_capacity(buckets * 3);
    for b in 0..buckets {
        // Mean of the bucket's slice keeps spikes visible at any width.
        let lo = b * values.len() / buckets;
        let hi = ((b + 1) * values.len() / buckets).max(lo + 1);
        let slice = &values[lo..hi];
        let avg = slice.iter().sum::<f64>() / slice.len() as f64;

        let level = if range == 0.0 {
            0
        } else {
            (((avg - min) / range) * (SPARK_LEVELS.len() - 1) as f64).round() as usize
        };
        out.push(SPARK_LEVELS[level.min(SPARK_LEVELS.len() - 1)]);
    }
    out
}

/// Write the cumulative-return curve as `date,cum_return` rows.
///
/// Undefined cells are written as empty fields, keeping row alignment with
/// the input series.
pub fn write_curve_csv(annotated: &AnnotatedSeries, path: &Path) -> Result<(), ScanError> {
    let mut file = File::create(path)?;
    writeln!(file, "date,cum_return")?;
    for (date, cum) in annotated.dates.iter().zip(annotated.cum_returns.iter()) {
        match cum {
            Some(c) => writeln!(file, "{},{}", date, c)?,
            None => writeln!(file, "{},", date)?,
        }
    }
    Ok(())
}

/// Write every annotated column for one backtest, one row per date.
pub fn write_annotated_csv(annotated: &AnnotatedSeries, path: &Path) -> Result<(), ScanError> {
    fn cell_f64(v: &Option<f64>) -> String {
        v.map(|x| x.to_string()).unwrap_or_default()
    }
    fn cell_i8(v: &Option<i8>) -> String {
        v.map(|x| x.to_string()).unwrap_or_default()
    }

    let mut file = File::create(path)?;
    writeln!(
        file,
        "date,close_a,close_b,spread,moving_average,moving_std_dev,upper_band,lower_band,\
         positions_long,positions_short,positions,perc_change,strat_returns,cum_returns,drawdown"
    )?;
    for i in 0..annotated.len() {
        writeln!(
            file,
            "{},{},{},{},{},{},{},{},{},{},{},{},{},{},{}",
            annotated.dates[i],
            annotated.close_a[i],
            annotated.close_b[i],
            annotated.spread[i],
            cell_f64(&annotated.moving_average[i]),
            cell_f64(&annotated.moving_std_dev[i]),
            cell_f64(&annotated.upper_band[i]),
            cell_f64(&annotated.lower_band[i]),
            cell_i8(&annotated.positions_long[i]),
            cell_i8(&annotated.positions_short[i]),
            cell_i8(&annotated.positions[i]),
            cell_f64(&annotated.perc_change[i]),
            cell_f64(&annotated.strat_returns[i]),
            cell_f64(&annotated.cum_returns[i]),
            cell_f64(&annotated.drawdown[i]),
        )?;
    }
    Ok(())
}
