//! Single-pair mean-reversion backtest engine.
//!
//! One [`PairBacktest`] owns one aligned price series and walks the full
//! pipeline: cointegration fit → half-life → band signals → returns. The
//! engine is a pure, sequential computation with no I/O; orchestration and
//! reporting live in the `scan` module.

pub mod error;
pub mod returns;
pub mod series;
pub mod signal;

pub use error::BacktestError;
pub use returns::ReturnsSeries;
pub use series::{AlignedPriceSeries, AnnotatedSeries};
pub use signal::{generate_signals, SignalSeries};

use tracing::{debug, info, warn};

use crate::stats::{adf_test, mean, ols_no_intercept};

/// Fraction of rows used to fit the hedge ratio.
pub const IN_SAMPLE_FRACTION: f64 = 0.9;

/// Supported confidence levels for the cointegration test.
///
/// Each level maps to the matching significance label of the ADF
/// critical-value table (a 90% confidence test reads the 10% column).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfidenceLevel {
    P90,
    P95,
    P99,
}

impl ConfidenceLevel {
    pub fn as_percent(self) -> u32 {
        match self {
            ConfidenceLevel::P90 => 90,
            ConfidenceLevel::P95 => 95,
            ConfidenceLevel::P99 => 99,
        }
    }

    pub fn critical_label(self) -> &'static str {
        match self {
            ConfidenceLevel::P90 => "10%",
            ConfidenceLevel::P95 => "5%",
            ConfidenceLevel::P99 => "1%",
        }
    }
}

impl TryFrom<u32> for ConfidenceLevel {
    type Error = BacktestError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            90 => Ok(ConfidenceLevel::P90),
            95 => Ok(ConfidenceLevel::P95),
            99 => Ok(ConfidenceLevel::P99),
            given => Err(BacktestError::InvalidConfidenceLevel { given }),
        }
    }
}

/// Per-backtest knobs; see `ScanConfig` for the file-level counterparts.
#[derive(Debug, Clone)]
pub struct BacktestConfig {
    pub confidence_level: ConfidenceLevel,
    /// Pairs with a half-life outside (0, this] days are discarded.
    pub max_half_life_days: f64,
    pub leverage: f64,
    /// When set, the stationarity test only sees the in-sample spread
    /// prefix. Off by default, the test runs on the full sample — including
    /// the rows the fit never saw, which leaks the held-out tail into the
    /// verdict.
    pub strict_out_of_sample: bool,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        Self {
            confidence_level: ConfidenceLevel::P90,
            max_half_life_days: 60.0,
            leverage: 1.0,
            strict_out_of_sample: false,
        }
    }
}

/// Hedge-ratio fit over the in-sample prefix.
#[derive(Debug, Clone, Copy)]
pub struct FitResult {
    pub hedge_ratio: f64,
    pub in_sample_len: usize,
}

/// Outcome of the cointegration test.
#[derive(Debug, Clone)]
pub struct CointegrationVerdict {
    /// ADF statistic of the spread (NaN when the regression degenerates).
    pub statistic: f64,
    /// Critical values keyed by significance label ("1%", "5%", "10%").
    pub critical_values: Vec<(&'static str, f64)>,
    pub is_stationary: bool,
    pub lag_order: usize,
}

impl CointegrationVerdict {
    fn not_stationary() -> Self {
        Self {
            statistic: f64::NAN,
            critical_values: Vec::new(),
            is_stationary: false,
            lag_order: 0,
        }
    }
}

/// Final result of one pair backtest.
#[derive(Debug, Clone)]
pub struct BacktestReport {
    pub symbol_a: String,
    pub symbol_b: String,
    pub cagr: f64,
    pub annualized_volatility: f64,
    pub win_ratio: f64,
    pub max_drawdown: f64,
    pub hedge_ratio: f64,
    pub half_life_days: f64,
    pub annotated: AnnotatedSeries,
}

/// One pair backtest run: owns its input, caches intermediate state.
pub struct PairBacktest {
    symbol_a: String,
    symbol_b: String,
    series: AlignedPriceSeries,
    config: BacktestConfig,
    cleaned: Option<AlignedPriceSeries>,
    fit_result: Option<FitResult>,
    spread: Option<Vec<f64>>,
    half_life: Option<f64>,
}

impl PairBacktest {
    pub fn new(
        symbol_a: impl Into<String>,
        symbol_b: impl Into<String>,
        series: AlignedPriceSeries,
        config: BacktestConfig,
    ) -> Self {
        Self {
            symbol_a: symbol_a.into(),
            symbol_b: symbol_b.into(),
            series,
            config,
            cleaned: None,
            fit_result: None,
            spread: None,
            half_life: None,
        }
    }

    pub fn hedge_ratio(&self) -> Option<f64> {
        self.fit_result.map(|f| f.hedge_ratio)
    }

    /// Fit the hedge ratio and test the spread for stationarity.
    ///
    /// The in-sample size is 90% of the row count BEFORE cleaning, so a
    /// series with many non-finite rows fails the sufficiency check rather
    /// than silently shrinking its requirement. The fitted hedge ratio and
    /// full-sample spread are retained for the later pipeline stages.
    pub fn fit(&mut self) -> Result<CointegrationVerdict, BacktestError> {
        let n = (self.series.len() as f64 * IN_SAMPLE_FRACTION).floor() as usize;
        let cleaned = self.series.cleaned();

        if cleaned.is_empty() || cleaned.len() < n || n == 0 {
            return Err(BacktestError::InsufficientData {
                required: n.max(1),
                actual: cleaned.len(),
            });
        }

        let Some(hedge_ratio) =
            ols_no_intercept(&cleaned.close_a[..n], &cleaned.close_b[..n])
        else {
            warn!(
                pair = format!("{}-{}", self.symbol_a, self.symbol_b),
                "Degenerate hedge regression (zero regressor variance)"
            );
            return Ok(CointegrationVerdict::not_stationary());
        };

        info!(
            pair = format!("{}-{}", self.symbol_a, self.symbol_b),
            hedge_ratio = format!("{:.4}", hedge_ratio),
            in_sample = n,
            "Hedge ratio fitted"
        );

        // Spread over ALL rows, including the held-out tail: the signal
        // stage trades the full sample.
        let spread: Vec<f64> = cleaned
            .close_a
            .iter()
            .zip(cleaned.close_b.iter())
            .map(|(a, b)| a - hedge_ratio * b)
            .collect();

        let test_window = if self.config.strict_out_of_sample {
            &spread[..n]
        } else {
            &spread[..]
        };

        let verdict = match adf_test(test_window) {
            Some(adf) => {
                let label = self.config.confidence_level.critical_label();
                let critical = adf.critical_value(label).unwrap_or(f64::NAN);
                debug!(
                    pair = format!("{}-{}", self.symbol_a, self.symbol_b),
                    statistic = format!("{:.2}", adf.statistic),
                    critical = format!("{:.2}", critical),
                    lags = adf.lag_order,
                    "ADF test complete"
                );
                CointegrationVerdict {
                    statistic: adf.statistic,
                    critical_values: adf.critical_values,
                    is_stationary: adf.statistic < critical,
                    lag_order: adf.lag_order,
                }
            }
            None => {
                debug!(
                    pair = format!("{}-{}", self.symbol_a, self.symbol_b),
                    "ADF regression degenerate, treating spread as non-stationary"
                );
                CointegrationVerdict::not_stationary()
            }
        };

        self.fit_result = Some(FitResult {
            hedge_ratio,
            in_sample_len: n,
        });
        self.spread = Some(spread);
        self.cleaned = Some(cleaned);

        Ok(verdict)
    }

    /// Mean-reversion half-life of the spread, in days.
    ///
    /// Regresses the one-step spread change on the deviation from the mean
    /// (no intercept) and converts the decay coefficient: `|ln 2 / θ|`.
    /// Idempotent; the value is computed once per instance. Requires a
    /// successful [`fit`](Self::fit) first.
    pub fn half_life(&mut self) -> Result<f64, BacktestError> {
        if let Some(half_life) = self.half_life {
            return Ok(half_life);
        }

        let spread = self
            .spread
            .as_ref()
            .ok_or(BacktestError::UndefinedHalfLife)?;
        if spread.len() < 2 {
            return Err(BacktestError::UndefinedHalfLife);
        }

        let spread_mean = mean(spread);
        // x[t] = mean - spread[t]; y[t] = spread[t+1] - spread[t]. The last
        // row has no forward change and is dropped.
        let x: Vec<f64> = spread[..spread.len() - 1]
            .iter()
            .map(|s| spread_mean - s)
            .collect();
        let y: Vec<f64> = spread.windows(2).map(|w| w[1] - w[0]).collect();

        let theta = ols_no_intercept(&y, &x).ok_or(BacktestError::UndefinedHalfLife)?;
        if theta == 0.0 {
            return Err(BacktestError::UndefinedHalfLife);
        }
        if theta < 0.0 {
            warn!(
                pair = format!("{}-{}", self.symbol_a, self.symbol_b),
                theta = format!("{:.6}", theta),
                "Spread is diverging, not reverting (negative decay coefficient)"
            );
        }

        let half_life = (2.0_f64.ln() / theta).abs();
        if !half_life.is_finite() {
            return Err(BacktestError::UndefinedHalfLife);
        }

        self.half_life = Some(half_life);
        Ok(half_life)
    }

    /// Run the full pipeline: fit, qualify, signal, and compute returns.
    ///
    /// Errors carry the skip-vs-fatal distinction of [`BacktestError`]; any
    /// statistical disqualification leaves the engine reusable for
    /// diagnostics (the fitted state stays cached).
    pub fn run(&mut self) -> Result<BacktestReport, BacktestError> {
        let verdict = self.fit()?;
        if !verdict.is_stationary {
            let level = self.config.confidence_level;
            let critical = verdict
                .critical_values
                .iter()
                .find(|(l, _)| *l == level.critical_label())
                .map(|(_, v)| *v)
                .unwrap_or(f64::NAN);
            return Err(BacktestError::NotCointegrated {
                level: level.as_percent(),
                statistic: verdict.statistic,
                critical,
            });
        }

        let half_life = self.half_life()?;
        if half_life <= 0.0 || half_life > self.config.max_half_life_days {
            return Err(BacktestError::HalfLifeOutOfRange {
                half_life,
                max: self.config.max_half_life_days,
            });
        }

        let lookback = half_life.floor() as usize;
        if lookback == 0 {
            return Err(BacktestError::InvalidLookback { half_life });
        }

        info!(
            pair = format!("{}-{}", self.symbol_a, self.symbol_b),
            half_life = format!("{:.1}d", half_life),
            lookback,
            "Running mean-reversion strategy"
        );

        // fit() populated these before any Ok verdict.
        let fit = self.fit_result.expect("fit state retained");
        let spread = self.spread.as_ref().expect("spread retained");
        let cleaned = self.cleaned.as_ref().expect("cleaned series retained");

        let signals = generate_signals(spread, lookback);
        let returns = returns::compute_returns(
            &signals.positions,
            spread,
            &cleaned.close_a,
            &cleaned.close_b,
            fit.hedge_ratio,
            self.config.leverage,
        );

        info!(
            pair = format!("{}-{}", self.symbol_a, self.symbol_b),
            cum_return = format!("{:.2}%", (returns.final_return - 1.0) * 100.0),
            cagr = format!("{:.2}%", returns.cagr * 100.0),
            "Backtest complete"
        );

        let annotated = AnnotatedSeries {
            dates: cleaned.dates.clone(),
            close_a: cleaned.close_a.clone(),
            close_b: cleaned.close_b.clone(),
            spread: spread.clone(),
            moving_average: signals.moving_average,
            moving_std_dev: signals.moving_std_dev,
            upper_band: signals.upper_band,
            lower_band: signals.lower_band,
            positions_long: signals.positions_long,
            positions_short: signals.positions_short,
            positions: signals.positions,
            perc_change: returns.perc_change,
            strat_returns: returns.strat_returns,
            cum_returns: returns.cum_returns,
            drawdown: returns.drawdown,
        };

        Ok(BacktestReport {
            symbol_a: self.symbol_a.clone(),
            symbol_b: self.symbol_b.clone(),
            cagr: returns.cagr,
            annualized_volatility: returns.annualized_volatility,
            win_ratio: returns.win_ratio,
            max_drawdown: returns.max_drawdown,
            hedge_ratio: fit.hedge_ratio,
            half_life_days: half_life,
            annotated,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn dates(n: usize) -> Vec<NaiveDate> {
        let start = NaiveDate::from_ymd_opt(2019, 1, 1).unwrap();
        (0..n)
            .map(|i| start + chrono::Days::new(i as u64))
            .collect()
    }

    fn lcg_noise(seed: u64, len: usize) -> Vec<f64> {
        let mut state = seed;
        (0..len)
            .map(|_| {
                state = state.wrapping_mul(6364136223846793005).wrapping_add(1);
                ((state >> 33) as f64) / (u32::MAX as f64) - 0.5
            })
            .collect()
    }

    /// B is a noisy walk, A = k*B plus AR(1) mean-reverting noise.
    fn cointegrated_pair(k: f64, phi: f64, len: usize, seed: u64) -> AlignedPriceSeries {
        let walk = lcg_noise(seed, len);
        let noise = lcg_noise(seed.wrapping_add(99), len);

        let mut close_b = Vec::with_capacity(len);
        let mut level = 100.0;
        for w in &walk {
            level += w;
            close_b.push(level);
        }

        let mut close_a = Vec::with_capacity(len);
        let mut resid = 0.0;
        for (b, w) in close_b.iter().zip(noise.iter()) {
            resid = phi * resid + w;
            close_a.push(k * b + resid);
        }

        AlignedPriceSeries::new(dates(len), close_a, close_b)
    }

    #[test]
    fn test_invalid_confidence_level() {
        let err = ConfidenceLevel::try_from(85).unwrap_err();
        assert!(matches!(
            err,
            BacktestError::InvalidConfidenceLevel { given: 85 }
        ));
        assert!(ConfidenceLevel::try_from(95).is_ok());
    }

    #[test]
    fn test_fit_recovers_hedge_ratio() {
        let series = cointegrated_pair(2.0, 0.5, 400, 11);
        let mut backtest =
            PairBacktest::new("A", "B", series, BacktestConfig::default());
        let verdict = backtest.fit().unwrap();

        assert!(verdict.is_stationary, "cointegrated pair should pass ADF");
        let hedge = backtest.hedge_ratio().unwrap();
        assert!(
            (hedge - 2.0).abs() < 0.2,
            "hedge ratio should be near 2.0, got {hedge}"
        );
    }

    #[test]
    fn test_random_walk_pair_not_stationary() {
        let len = 400;
        let walk_a = lcg_noise(5, len);
        let walk_b = lcg_noise(17, len);

        let mut a = Vec::new();
        let mut b = Vec::new();
        let (mut la, mut lb) = (100.0, 80.0);
        for i in 0..len {
            la += walk_a[i];
            lb += walk_b[i];
            a.push(la);
            b.push(lb);
        }

        // Test at the 99% level: a unit-root process still rejects with
        // ~10% probability at 90% by construction of the DF distribution.
        let config = BacktestConfig {
            confidence_level: ConfidenceLevel::P99,
            ..BacktestConfig::default()
        };
        let series = AlignedPriceSeries::new(dates(len), a, b);
        let mut backtest = PairBacktest::new("A", "B", series, config);
        let verdict = backtest.fit().unwrap();
        assert!(!verdict.is_stationary, "independent walks should fail ADF");

        let err = backtest.run().unwrap_err();
        assert!(matches!(err, BacktestError::NotCointegrated { .. }));
    }

    #[test]
    fn test_half_life_matches_ar1_decay() {
        // Spread is AR(1) with phi = 0.85 around a k*B relationship; the
        // estimated half-life should approximate ln(2)/(-ln(phi)) ≈ 4.27.
        let phi: f64 = 0.85;
        let series = cointegrated_pair(1.5, phi, 2000, 23);
        let mut backtest =
            PairBacktest::new("A", "B", series, BacktestConfig::default());
        backtest.fit().unwrap();

        let half_life = backtest.half_life().unwrap();
        let expected = 2.0_f64.ln() / (-phi.ln());
        assert!(
            (half_life - expected).abs() / expected < 0.5,
            "half-life {half_life:.2} should be near {expected:.2}"
        );
    }

    #[test]
    fn test_half_life_memoized() {
        let series = cointegrated_pair(2.0, 0.5, 300, 31);
        let mut backtest =
            PairBacktest::new("A", "B", series, BacktestConfig::default());
        backtest.fit().unwrap();

        let first = backtest.half_life().unwrap();
        let second = backtest.half_life().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_insufficient_data() {
        // 5 clean rows against a 200-row series: requirement is 180.
        let len = 200;
        let mut close_a = vec![f64::NAN; len];
        let mut close_b = vec![f64::NAN; len];
        for i in 0..5 {
            close_a[i] = 100.0 + i as f64;
            close_b[i] = 50.0 + i as f64;
        }

        let series = AlignedPriceSeries::new(dates(len), close_a, close_b);
        let mut backtest =
            PairBacktest::new("A", "B", series, BacktestConfig::default());
        let err = backtest.fit().unwrap_err();
        assert!(matches!(
            err,
            BacktestError::InsufficientData {
                required: 180,
                actual: 5
            }
        ));
    }

    #[test]
    fn test_empty_series_is_insufficient() {
        let series = AlignedPriceSeries::new(vec![], vec![], vec![]);
        let mut backtest =
            PairBacktest::new("A", "B", series, BacktestConfig::default());
        assert!(matches!(
            backtest.fit().unwrap_err(),
            BacktestError::InsufficientData { .. }
        ));
    }

    #[test]
    fn test_half_life_out_of_range_skips() {
        let series = cointegrated_pair(2.0, 0.5, 400, 11);
        let config = BacktestConfig {
            max_half_life_days: 0.5,
            ..BacktestConfig::default()
        };
        let mut backtest = PairBacktest::new("A", "B", series, config);
        let err = backtest.run().unwrap_err();
        assert!(matches!(err, BacktestError::HalfLifeOutOfRange { .. }));
    }

    #[test]
    fn test_exact_multiple_spread_has_undefined_half_life() {
        // A = 2B exactly: the spread is identically zero, the deviation
        // regression has no variance, and half-life must fail cleanly
        // instead of dividing by zero.
        let len = 300;
        let walk = lcg_noise(3, len);
        let mut close_b = Vec::with_capacity(len);
        let mut level = 100.0;
        for w in &walk {
            level += w;
            close_b.push(level);
        }
        let close_a: Vec<f64> = close_b.iter().map(|b| 2.0 * b).collect();

        let series = AlignedPriceSeries::new(dates(len), close_a, close_b);
        let mut backtest =
            PairBacktest::new("A", "B", series, BacktestConfig::default());
        let verdict = backtest.fit().unwrap();
        assert!(!verdict.is_stationary, "zero spread degenerates the ADF");

        let err = backtest.half_life().unwrap_err();
        assert!(matches!(err, BacktestError::UndefinedHalfLife));
    }

    #[test]
    fn test_diverging_spread_yields_absolute_half_life() {
        // A doubling spread has a negative decay coefficient; the engine
        // warns and still returns the absolute value.
        let series = cointegrated_pair(2.0, 0.5, 300, 31);
        let mut backtest =
            PairBacktest::new("A", "B", series, BacktestConfig::default());
        backtest.fit().unwrap();

        backtest.spread = Some(vec![1.0, 2.0, 4.0, 8.0, 16.0, 32.0]);
        backtest.half_life = None;

        let half_life = backtest.half_life().unwrap();
        assert!(half_life > 0.0 && half_life.is_finite());
    }

    #[test]
    fn test_end_to_end_cointegrated_pair() {
        // phi = 0.91 targets a half-life of roughly a week and a half.
        let series = cointegrated_pair(2.0, 0.91, 500, 47);
        let mut backtest =
            PairBacktest::new("A", "B", series, BacktestConfig::default());
        let report = backtest.run().unwrap();

        assert!((report.hedge_ratio - 2.0).abs() < 0.2);
        assert!(
            report.half_life_days >= 5.0 && report.half_life_days <= 20.0,
            "half-life {:.1} should land in [5, 20]",
            report.half_life_days
        );
        assert!(report.win_ratio > 0.0 && report.win_ratio < 1.0);
        assert!(report.max_drawdown <= 0.0);
        assert_eq!(report.annotated.len(), 500);
    }
}
