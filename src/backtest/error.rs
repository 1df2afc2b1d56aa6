//! Error types for the pair backtest engine.

use thiserror::Error;

/// Errors raised while qualifying and backtesting a single pair.
///
/// Most variants mean "this pair does not qualify" and are recoverable: the
/// scan driver logs them and moves to the next candidate. Only
/// `InvalidConfidenceLevel` indicates a caller bug; retrying with the same
/// input cannot succeed.
#[derive(Error, Debug)]
pub enum BacktestError {
    /// Confidence level outside the supported set {90, 95, 99}.
    #[error("invalid confidence level {given}: supported levels are 90, 95 and 99")]
    InvalidConfidenceLevel { given: u32 },

    /// Cleaned series shorter than the in-sample requirement.
    #[error("insufficient data: need at least {required} clean rows, got {actual}")]
    InsufficientData { required: usize, actual: usize },

    /// ADF statistic did not beat the critical value at the requested level.
    #[error(
        "spread is not stationary at the {level}% level: statistic {statistic:.2} vs critical {critical:.2}"
    )]
    NotCointegrated {
        level: u32,
        statistic: f64,
        critical: f64,
    },

    /// The AR decay coefficient was zero or non-finite; no half-life exists.
    #[error("half-life is undefined: spread deviation regression has no usable slope")]
    UndefinedHalfLife,

    /// Half-life computed but outside the acceptable range.
    #[error("half-life {half_life:.1} days outside (0, {max:.0}]")]
    HalfLifeOutOfRange { half_life: f64, max: f64 },

    /// Half-life rounds down to a zero-length lookback window.
    #[error("half-life {half_life:.2} rounds to a zero lookback window")]
    InvalidLookback { half_life: f64 },
}

impl BacktestError {
    /// Whether the scan driver should skip the pair and continue.
    ///
    /// Statistical non-results are skippable; a bad confidence level is not.
    pub fn is_skippable(&self) -> bool {
        !matches!(self, BacktestError::InvalidConfidenceLevel { .. })
    }
}
